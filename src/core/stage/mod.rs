use anyhow::{anyhow, Context};

use crate::aws::StorageApi;
use crate::core::types::DefinitionSource;

/// Inline-payload limit of the registration API, in KiB. Archives strictly
/// larger than this are staged to object storage and referenced by URI.
pub const INLINE_LIMIT_KIB: f64 = 4.0;

/// Object key used for a staged definition archive.
pub fn bundle_key(workflow_name: &str) -> String {
    format!("bundle-{}.zip", workflow_name)
}

/// Decide between inline submission and staged upload for a definition
/// archive. Returns the staged URI when the archive was uploaded; otherwise
/// hands the bytes back for inline embedding. Upload errors propagate.
pub async fn stage_definition(
    storage: &dyn StorageApi,
    archive: Vec<u8>,
    staging_uri: &str,
    workflow_name: &str,
) -> crate::Result<DefinitionSource> {
    let size_kib = archive.len() as f64 / 1024.0;
    if size_kib <= INLINE_LIMIT_KIB {
        tracing::debug!(
            "definition archive is {:.1} KiB, embedding inline",
            size_kib
        );
        return Ok(DefinitionSource::Inline(archive));
    }

    let definition_uri = format!(
        "{}/{}",
        staging_uri.trim_end_matches('/'),
        bundle_key(workflow_name)
    );
    let (bucket, key) = parse_s3_uri(&definition_uri)?;
    tracing::info!("staging workflow definition to {}", definition_uri);
    storage
        .put_object(&bucket, &key, archive)
        .await
        .with_context(|| format!("failed to upload definition to {}", definition_uri))?;

    Ok(DefinitionSource::Staged(definition_uri))
}

/// Split an `s3://bucket/key` URI into bucket and key.
pub fn parse_s3_uri(uri: &str) -> crate::Result<(String, String)> {
    let rest = uri
        .strip_prefix("s3://")
        .ok_or_else(|| anyhow!("expected s3:// URI, got '{}'", uri))?;
    match rest.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
            Ok((bucket.to_string(), key.to_string()))
        }
        _ => Err(anyhow!("URI '{}' is missing a bucket or key", uri)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::fakes::FakeStorage;

    #[tokio::test]
    async fn test_small_archive_stays_inline() {
        let storage = FakeStorage::default();
        let archive = vec![0u8; 2 * 1024];
        let source = stage_definition(&storage, archive.clone(), "s3://bucket", "to_bam")
            .await
            .unwrap();
        assert_eq!(source, DefinitionSource::Inline(archive));
        assert_eq!(*storage.put_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_exactly_at_limit_stays_inline() {
        // The rule is strictly greater than 4.0 KiB.
        let storage = FakeStorage::default();
        let archive = vec![0u8; 4096];
        let source = stage_definition(&storage, archive, "s3://bucket", "to_bam")
            .await
            .unwrap();
        assert!(matches!(source, DefinitionSource::Inline(_)));
    }

    #[tokio::test]
    async fn test_large_archive_is_staged() {
        let storage = FakeStorage::default();
        let archive = vec![0u8; 10 * 1024];
        let source = stage_definition(&storage, archive.clone(), "s3://bucket", "to_bam")
            .await
            .unwrap();
        assert_eq!(
            source,
            DefinitionSource::Staged("s3://bucket/bundle-to_bam.zip".to_string())
        );
        assert_eq!(*storage.put_calls.lock().unwrap(), 1);
        assert_eq!(
            storage.object("bucket", "bundle-to_bam.zip"),
            Some(archive)
        );
    }

    #[test]
    fn test_parse_s3_uri() {
        assert_eq!(
            parse_s3_uri("s3://bucket/prefix/file.zip").unwrap(),
            ("bucket".to_string(), "prefix/file.zip".to_string())
        );
        assert!(parse_s3_uri("https://bucket/file.zip").is_err());
        assert!(parse_s3_uri("s3://bucket").is_err());
    }
}
