use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a storage key is embedded in a URL path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;
    async fn object_exists(&self, key: &str) -> Result<bool>;
    async fn delete_object(&self, key: &str) -> Result<()>;
    /// Public, path-style URL under which the object can be fetched.
    fn public_url(&self, key: &str) -> String;
}

pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    public_url_base: String,
}

impl S3ObjectStorage {
    pub fn new(client: Client, bucket: String, public_url_base: String) -> Self {
        Self {
            client,
            bucket,
            public_url_base: public_url_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let res = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        let data = res.body.collect().await?.to_vec();
        Ok(data)
    }

    async fn object_exists(&self, key: &str) -> Result<bool> {
        let res = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(anyhow::anyhow!(service_error))
                }
            }
        }
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect();
        format!(
            "{}/{}/{}",
            self.public_url_base,
            self.bucket,
            encoded.join("/")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> S3ObjectStorage {
        let conf = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .build();
        S3ObjectStorage::new(
            Client::from_conf(conf),
            "3d-models".to_string(),
            "http://127.0.0.1:9000/".to_string(),
        )
    }

    #[test]
    fn test_public_url_is_path_style() {
        let url = storage().public_url("public/17_cube.obj");
        assert_eq!(url, "http://127.0.0.1:9000/3d-models/public/17_cube.obj");
    }

    #[test]
    fn test_public_url_escapes_spaces() {
        let url = storage().public_url("public/17_my model.obj");
        assert_eq!(
            url,
            "http://127.0.0.1:9000/3d-models/public/17_my%20model.obj"
        );
    }
}
