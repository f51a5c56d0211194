//! Filesystem-backed resource registry.
//!
//! Layout: `<base>/<tn_id>/<registry path>` holds the content and
//! `<base>/<tn_id>/<registry path>.meta.json` holds the media type.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{
	fs::{File, create_dir_all, metadata, read, remove_file, rename},
	io::AsyncWriteExt,
};

use apimcfg_types::{prelude::*, registry_adapter::RegistryAdapter, types::Resource};

const META_SUFFIX: &str = ".meta.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceMeta {
	media_type: Option<Box<str>>,
}

/// Validates a registry path and maps it below the tenant root
fn obj_file_path(base_dir: &Path, tn_id: TnId, path: &str) -> ClResult<PathBuf> {
	let Some(relative) = path.strip_prefix('/') else {
		return Err(Error::ValidationError(format!("registry path must be absolute: {}", path)));
	};
	if relative.is_empty() || relative.ends_with(META_SUFFIX) || relative.contains('\\') {
		return Err(Error::ValidationError(format!("invalid registry path: {}", path)));
	}

	let mut file_path = base_dir.join(tn_id.to_string());
	for segment in relative.split('/') {
		let mut components = Path::new(segment).components();
		match (components.next(), components.next()) {
			(Some(Component::Normal(name)), None) => file_path.push(name),
			_ => {
				return Err(Error::ValidationError(format!("invalid registry path: {}", path)));
			}
		}
	}
	Ok(file_path)
}

fn meta_file_path(file_path: &Path) -> PathBuf {
	let mut name = file_path.as_os_str().to_owned();
	name.push(META_SUFFIX);
	PathBuf::from(name)
}

/// Writes through a temporary file in the same directory, then renames it into place
async fn write_atomic(dest: &Path, data: &[u8]) -> ClResult<()> {
	let dir = dest.parent().ok_or_else(|| Error::Internal("registry file has no parent".into()))?;
	let tmp_path = dir.join(format!(".tmp-{}", uuid::Uuid::new_v4()));

	let res = async {
		let mut file = File::create(&tmp_path).await?;
		file.write_all(data).await?;
		file.sync_all().await?;
		rename(&tmp_path, dest).await?;
		Ok::<(), Error>(())
	}
	.await;

	if res.is_err() {
		debug!("registry write failed, removing tmpfile: {:?}", &tmp_path);
		let _ignore = remove_file(&tmp_path).await;
	}
	res
}

#[derive(Debug)]
pub struct RegistryAdapterFs {
	base_dir: Box<Path>,
}

impl RegistryAdapterFs {
	pub async fn new(base_dir: impl Into<Box<Path>>) -> ClResult<Self> {
		let base_dir = base_dir.into();
		create_dir_all(&base_dir).await?;
		info!("Registry root: {:?}", base_dir);
		Ok(Self { base_dir })
	}
}

#[async_trait]
impl RegistryAdapter for RegistryAdapterFs {
	async fn exists(&self, tn_id: TnId, path: &str) -> ClResult<bool> {
		let file_path = obj_file_path(&self.base_dir, tn_id, path)?;
		match metadata(&file_path).await {
			Ok(meta) => Ok(meta.is_file()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
			Err(err) => Err(Error::Io(err)),
		}
	}

	async fn get(&self, tn_id: TnId, path: &str) -> ClResult<Option<Resource>> {
		let file_path = obj_file_path(&self.base_dir, tn_id, path)?;
		let content = match read(&file_path).await {
			Ok(content) => content,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(Error::Io(err)),
		};

		let meta = match read(meta_file_path(&file_path)).await {
			Ok(data) => serde_json::from_slice::<ResourceMeta>(&data)?,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => ResourceMeta::default(),
			Err(err) => return Err(Error::Io(err)),
		};

		Ok(Some(Resource { content: content.into_boxed_slice(), media_type: meta.media_type }))
	}

	async fn put(&self, tn_id: TnId, path: &str, resource: Resource) -> ClResult<()> {
		let file_path = obj_file_path(&self.base_dir, tn_id, path)?;
		debug!("put: {:?}", &file_path);
		if let Some(dir) = file_path.parent() {
			create_dir_all(dir).await?;
		}

		// Content before sidecar
		write_atomic(&file_path, &resource.content).await?;

		let meta_path = meta_file_path(&file_path);
		if resource.media_type.is_some() {
			let meta = serde_json::to_vec(&ResourceMeta { media_type: resource.media_type })?;
			write_atomic(&meta_path, &meta).await
		} else {
			match remove_file(&meta_path).await {
				Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(Error::Io(err)),
				_ => Ok(()),
			}
		}
	}
}


// vim: ts=4
