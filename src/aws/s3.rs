use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};

use super::error::{ProviderError, ResourceKind};

/// Object-storage operations: bucket existence, bucket creation, uploads.
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Existence check. `Ok(false)` only for a definite 404; any other
    /// failure propagates so it cannot masquerade as "absent".
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, ProviderError>;

    async fn create_bucket(&self, bucket: &str) -> Result<(), ProviderError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), ProviderError>;
}

/// Object storage backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct SdkStorage {
    client: aws_sdk_s3::Client,
    region: String,
}

impl SdkStorage {
    pub fn new(client: aws_sdk_s3::Client, region: &str) -> Self {
        SdkStorage {
            client,
            region: region.to_string(),
        }
    }
}

#[async_trait]
impl StorageApi for SdkStorage {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, ProviderError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let service = err.into_service_error();
                if service.is_not_found() {
                    Ok(false)
                } else if service.code() == Some("AccessDenied") {
                    Err(ProviderError::access_denied(ResourceKind::Bucket, bucket))
                } else {
                    Err(ProviderError::Service(service.to_string()))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), ProviderError> {
        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 is the default location and rejects an explicit constraint.
        if self.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|err| ProviderError::Service(err.into_service_error().to_string()))?;
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), ProviderError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                if service.code() == Some("AccessDenied") {
                    ProviderError::access_denied(ResourceKind::Object, key)
                } else {
                    ProviderError::Service(service.to_string())
                }
            })?;
        Ok(())
    }
}
