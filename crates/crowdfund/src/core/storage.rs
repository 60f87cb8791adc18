//! JSON file storage for state kept between CLI invocations
//!
//! Each key maps to `<root>/<key>.json`. Keys may contain `/` to group
//! records in subdirectories. Used for the local node's process record and
//! for deployment records; secrets never pass through here.

use crate::types::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File-based JSON key-value store
#[derive(Debug, Clone)]
pub struct Storage {
	root: Arc<PathBuf>,
}

impl Storage {
	/// Open a store rooted at `root`, creating the directory if needed
	pub fn new(root: &Path) -> Result<Self> {
		if !root.exists() {
			std::fs::create_dir_all(root).map_err(|e| {
				Error::StorageError(format!("Failed to create {}: {e}", root.display()))
			})?;
		}

		Ok(Self {
			root: Arc::new(root.to_path_buf()),
		})
	}

	/// Serialize `value` as pretty JSON under `key`
	pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
		let path = self.path_for(key);

		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}

		let file = std::fs::File::create(&path)
			.map_err(|e| Error::StorageError(format!("Failed to create {key}: {e}")))?;

		serde_json::to_writer_pretty(file, value)
			.map_err(|e| Error::StorageError(format!("Failed to write {key}: {e}")))
	}

	/// Load the value stored under `key`
	///
	/// # Errors
	/// Returns `StorageError` if the key does not exist or does not
	/// deserialize as `T`
	pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
		self.load_optional(key)?
			.ok_or_else(|| Error::StorageError(format!("File not found: {key}")))
	}

	/// Load the value under `key`, or `None` when nothing was stored
	pub fn load_optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
		let path = self.path_for(key);

		if !path.exists() {
			return Ok(None);
		}

		let file = std::fs::File::open(&path)
			.map_err(|e| Error::StorageError(format!("Failed to open {key}: {e}")))?;

		serde_json::from_reader(file)
			.map(Some)
			.map_err(|e| Error::StorageError(format!("Failed to read {key}: {e}")))
	}

	pub fn exists(&self, key: &str) -> bool {
		self.path_for(key).exists()
	}

	/// Remove `key`. Removing a missing key is not an error
	pub fn delete(&self, key: &str) -> Result<()> {
		let path = self.path_for(key);

		if path.exists() {
			std::fs::remove_file(&path)
				.map_err(|e| Error::StorageError(format!("Failed to delete {key}: {e}")))?;
		}

		Ok(())
	}

	fn path_for(&self, key: &str) -> PathBuf {
		self.root.join(format!("{key}.json"))
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}
