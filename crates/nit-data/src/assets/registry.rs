// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::document::AssetDocument;
use super::storage::{Applied, AssetStorage, TypedAssets};
use super::{AssetError, AssetTypeArgs};
use crate::sparse_set::INVALID_INDEX;
use nit_core::asset::{Asset, AssetCreated, AssetDestroyed, AssetHandle, AssetInfo};
use nit_core::check;
use nit_core::config::AssetConfig;
use nit_core::event::EventBus;
use nit_core::TypeInfo;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The owner of every asset pool.
///
/// Each registered type gets a self-managed pool plus one [`AssetInfo`] per
/// asset. Callers refer to assets through [`AssetHandle`]s, which are
/// revalidated by every operation. Lookups by name visit types in
/// registration order and assets in dense order.
pub struct AssetRegistry {
    config: AssetConfig,
    storages: Vec<Box<dyn AssetStorage>>,
    type_indices: HashMap<TypeId, usize>,
    asset_created: EventBus<AssetCreated>,
    asset_destroyed: EventBus<AssetDestroyed>,
}

impl AssetRegistry {
    /// Creates a registry without asset types.
    pub fn new(config: AssetConfig) -> Self {
        log::info!(
            "Asset registry initialized (extension '{}').",
            config.extension
        );
        Self {
            config,
            storages: Vec::new(),
            type_indices: HashMap::new(),
            asset_created: EventBus::new(),
            asset_destroyed: EventBus::new(),
        }
    }

    /// The configuration the registry was built with.
    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    /// Extension of asset documents, leading dot included.
    pub fn extension(&self) -> &str {
        &self.config.extension
    }

    // --- Types ---

    /// Registers `T` with its hooks. Must precede any use of `T` assets.
    pub fn register_type<T: Asset>(&mut self, args: AssetTypeArgs<T>) -> Result<(), AssetError> {
        let type_info = match args.name {
            Some(name) => TypeInfo::named::<T>(name),
            None => TypeInfo::of::<T>(),
        };
        if self.type_indices.contains_key(&type_info.type_id)
            || self.index_by_name(type_info.name).is_some()
        {
            return check::fail(AssetError::AlreadyRegistered(type_info.name));
        }

        let capacity = args.capacity.unwrap_or(self.config.default_pool_capacity);
        let version = args.version;
        let storage = TypedAssets::new(type_info, capacity, args)?;
        self.type_indices.insert(type_info.type_id, self.storages.len());
        self.storages.push(Box::new(storage));

        log::debug!(
            "Registered asset type '{}' (version {version}, {capacity} slots).",
            type_info.name
        );
        Ok(())
    }

    /// Returns true if `T` was registered.
    pub fn is_type_registered<T: 'static>(&self) -> bool {
        self.type_indices.contains_key(&TypeId::of::<T>())
    }

    /// Current layout version of `T`.
    pub fn current_version<T: 'static>(&self) -> Option<u32> {
        let index = *self.type_indices.get(&TypeId::of::<T>())?;
        Some(self.storages[index].version())
    }

    /// Current layout version of the type registered under `type_name`.
    pub fn current_version_by_name(&self, type_name: &str) -> Option<u32> {
        let index = self.index_by_name(type_name)?;
        Some(self.storages[index].version())
    }

    /// Descriptors of the registered types, in registration order.
    pub fn asset_types(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.storages.iter().map(|storage| storage.type_info())
    }

    fn index_by_name(&self, type_name: &str) -> Option<usize> {
        self.storages
            .iter()
            .position(|storage| storage.type_info().name == type_name)
    }

    fn typed<T: Asset>(&self) -> Option<&TypedAssets<T>> {
        let index = *self.type_indices.get(&TypeId::of::<T>())?;
        self.storages[index].as_any().downcast_ref()
    }

    fn typed_mut<T: Asset>(&mut self) -> Option<&mut TypedAssets<T>> {
        let index = *self.type_indices.get(&TypeId::of::<T>())?;
        self.storages[index].as_any_mut().downcast_mut()
    }

    /// Index of the storage a handle points into, if the asset exists.
    fn index_of(&self, handle: &AssetHandle) -> Option<usize> {
        let type_info = handle.type_info?;
        let index = *self.type_indices.get(&type_info.type_id)?;
        self.storages[index].contains(handle.id).then_some(index)
    }

    fn valid_index(&self, handle: &AssetHandle) -> Result<usize, AssetError> {
        match self.index_of(handle) {
            Some(index) => Ok(index),
            None => check::fail(AssetError::InvalidHandle(handle.clone())),
        }
    }

    // --- Creation and access ---

    /// Stores `data` as a new asset of type `T`.
    ///
    /// `directory` is where the asset will be serialized; the recorded path is
    /// `directory/name` followed by the configured extension.
    pub fn create_asset<T: Asset>(
        &mut self,
        name: &str,
        directory: impl AsRef<Path>,
        data: T,
    ) -> Result<AssetHandle, AssetError> {
        let path = self.build_asset_path(name, directory.as_ref());
        let Some(storage) = self.typed_mut::<T>() else {
            return check::fail(AssetError::UnregisteredType(
                TypeInfo::of::<T>().name.to_string(),
            ));
        };

        let id = storage.create(name.to_string(), path.to_string_lossy().into_owned(), data)?;
        let handle = AssetHandle::new(name, storage.type_info(), id);
        log::debug!("Created asset {handle} at '{}'.", path.display());
        Ok(handle)
    }

    fn build_asset_path(&self, name: &str, directory: &Path) -> PathBuf {
        directory.join(format!("{name}{}", self.config.extension))
    }

    /// Returns true if the asset behind `handle` exists.
    pub fn is_valid(&self, handle: &AssetHandle) -> bool {
        self.index_of(handle).is_some()
    }

    /// Returns true if the asset exists and is loaded.
    pub fn is_loaded(&self, handle: &AssetHandle) -> bool {
        self.info(handle).is_some_and(|info| info.loaded)
    }

    /// Metadata of the asset behind `handle`.
    pub fn info(&self, handle: &AssetHandle) -> Option<&AssetInfo> {
        let index = self.index_of(handle)?;
        self.storages[index].info(handle.id)
    }

    /// Data of the asset behind `handle`. `None` if the handle is stale or
    /// names another type.
    pub fn get<T: Asset>(&self, handle: &AssetHandle) -> Option<&T> {
        if !handle.type_info.is_some_and(|info| info.is::<T>()) {
            return None;
        }
        self.typed::<T>()?.pool.get(handle.id)
    }

    /// Data of the asset behind `handle`, mutably.
    pub fn get_mut<T: Asset>(&mut self, handle: &AssetHandle) -> Option<&mut T> {
        if !handle.type_info.is_some_and(|info| info.is::<T>()) {
            return None;
        }
        self.typed_mut::<T>()?.pool.get_mut(handle.id)
    }

    /// Every asset's metadata: types in registration order, assets in dense order.
    pub fn infos(&self) -> impl Iterator<Item = &AssetInfo> {
        self.storages.iter().flat_map(|storage| storage.infos())
    }

    /// Handles to every asset, in the order of [`AssetRegistry::infos`].
    pub fn handles(&self) -> impl Iterator<Item = AssetHandle> + '_ {
        self.storages.iter().flat_map(|storage| {
            let type_info = storage.type_info();
            storage
                .infos()
                .iter()
                .map(move |info| AssetHandle::new(info.name.clone(), type_info, info.id))
        })
    }

    /// Number of live assets across all types.
    pub fn asset_count(&self) -> usize {
        self.storages.iter().map(|storage| storage.infos().len()).sum()
    }

    /// The first asset named `name`.
    pub fn find_by_name(&self, name: &str) -> Option<AssetHandle> {
        self.handles().find(|handle| handle.name == name)
    }

    /// Every asset named `name`.
    pub fn find_all_by_name(&self, name: &str) -> Vec<AssetHandle> {
        self.handles().filter(|handle| handle.name == name).collect()
    }

    // --- Lifecycle ---

    /// Runs the load hook of the asset.
    ///
    /// Does nothing if it is already loaded, unless `force_reload` is set, in
    /// which case it is freed and loaded again with its reference count kept.
    pub fn load(&mut self, handle: &AssetHandle, force_reload: bool) -> Result<(), AssetError> {
        let index = self.valid_index(handle)?;
        let storage = &mut self.storages[index];
        let Some(info) = storage.info(handle.id) else {
            return Ok(());
        };

        if info.loaded {
            if !force_reload {
                return Ok(());
            }
            let reference_count = info.reference_count;
            storage.free(handle.id);
            if let Some(info) = storage.info_mut(handle.id) {
                info.reference_count = reference_count;
            }
        }
        storage.load(handle.id);
        log::trace!("Loaded asset {handle}.");
        Ok(())
    }

    /// Runs the free hook of a loaded asset, drops its references and resets
    /// `handle`.
    pub fn free(&mut self, handle: &mut AssetHandle) -> Result<(), AssetError> {
        let index = self.valid_index(handle)?;
        self.storages[index].free(handle.id);
        log::trace!("Freed asset {handle}.");
        handle.invalidate();
        Ok(())
    }

    /// Loads the asset if needed and adds a reference.
    ///
    /// A stale or empty handle is ignored.
    pub fn retain(&mut self, handle: &AssetHandle) -> Result<(), AssetError> {
        if !self.is_valid(handle) {
            log::debug!("Ignoring retain of invalid handle {handle}.");
            return Ok(());
        }
        if !self.is_loaded(handle) {
            self.load(handle, false)?;
        }
        if let Some(info) = self.info_mut(handle) {
            info.reference_count += 1;
        }
        Ok(())
    }

    /// Drops a reference. The asset is freed, and `handle` reset, when
    /// `force_free` is set or this was the last reference.
    ///
    /// A stale or empty handle and an unloaded asset are ignored.
    pub fn release(&mut self, handle: &mut AssetHandle, force_free: bool) -> Result<(), AssetError> {
        if !self.is_valid(handle) {
            log::debug!("Ignoring release of invalid handle {handle}.");
            return Ok(());
        }
        let Some(info) = self.info_mut(handle) else {
            return Ok(());
        };
        if !info.loaded {
            return Ok(());
        }
        // A loaded asset that was never retained sits at zero and is freed here too.
        if force_free || info.reference_count <= 1 {
            return self.free(handle);
        }
        info.reference_count -= 1;
        Ok(())
    }

    fn info_mut(&mut self, handle: &AssetHandle) -> Option<&mut AssetInfo> {
        let index = self.index_of(handle)?;
        self.storages[index].info_mut(handle.id)
    }

    /// Frees the asset, broadcasts [`AssetDestroyed`], then erases it and
    /// resets `handle`. The asset's file is left on disk.
    pub fn destroy(&mut self, handle: &mut AssetHandle) -> Result<(), AssetError> {
        let index = self.valid_index(handle)?;
        let storage = &mut self.storages[index];
        let Some(info) = storage.info(handle.id) else {
            return check::fail(AssetError::InvalidHandle(handle.clone()));
        };
        let destroyed = AssetHandle::new(info.name.clone(), storage.type_info(), info.id);

        storage.free(handle.id);
        self.asset_destroyed.publish(&AssetDestroyed {
            handle: destroyed.clone(),
        });
        self.storages[index].remove(handle.id)?;
        log::debug!("Destroyed asset {destroyed}.");
        handle.invalidate();
        Ok(())
    }

    // --- Documents ---

    /// Renders the asset as a document.
    pub fn serialize_to_string(&self, handle: &AssetHandle) -> Result<String, AssetError> {
        let index = self.valid_index(handle)?;
        let storage = &self.storages[index];
        let Some(info) = storage.info(handle.id) else {
            return check::fail(AssetError::InvalidHandle(handle.clone()));
        };
        let document = AssetDocument {
            info: info.clone(),
            payload: storage.serialize(handle.id)?,
        };
        document.to_text()
    }

    /// Writes the asset to the path recorded in its metadata and returns that
    /// path. Missing parent directories are created.
    pub fn serialize_to_file(&self, handle: &AssetHandle) -> Result<PathBuf, AssetError> {
        let text = self.serialize_to_string(handle)?;
        let path = match self.info(handle) {
            Some(info) => PathBuf::from(&info.path),
            None => return check::fail(AssetError::InvalidHandle(handle.clone())),
        };
        let io_error = |source: std::io::Error| AssetError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&path, text).map_err(io_error)?;
        log::debug!("Serialized asset {handle} to '{}'.", path.display());
        Ok(path)
    }

    /// Applies a document: a new id creates the asset and broadcasts
    /// [`AssetCreated`]; a known id replaces its data in place.
    ///
    /// A document older than the type's current version, or one naming an id
    /// at or above `max_asset_id`, is refused and nothing is touched.
    pub fn deserialize_from_str(&mut self, text: &str) -> Result<AssetHandle, AssetError> {
        let document = match AssetDocument::parse(text) {
            Ok(document) => document,
            Err(err) => {
                log::warn!("Cannot read asset document: {err}");
                return Err(err);
            }
        };
        let AssetDocument { info, payload } = document;
        if info.id == INVALID_INDEX || info.id >= self.config.max_asset_id {
            let err = AssetError::MalformedDocument(format!(
                "asset '{}' has id {}, ids must be below {}",
                info.name, info.id, self.config.max_asset_id
            ));
            log::warn!("{err}");
            return Err(err);
        }

        let Some(index) = self.index_by_name(&info.type_name) else {
            return check::fail(AssetError::UnregisteredType(info.type_name));
        };
        let storage = &mut self.storages[index];
        let current = storage.version();
        if info.version < current {
            let err = AssetError::OutdatedAsset {
                type_name: info.type_name,
                name: info.name,
                found: info.version,
                current,
            };
            log::warn!("{err}");
            return Err(err);
        }

        let handle = AssetHandle::new(info.name.clone(), storage.type_info(), info.id);
        match storage.apply_document(info, payload)? {
            Applied::Created => {
                log::debug!("Deserialized new asset {handle}.");
                self.asset_created.publish(&AssetCreated {
                    handle: handle.clone(),
                });
            }
            Applied::Replaced => log::debug!("Reloaded asset {handle} in place."),
        }
        Ok(handle)
    }

    /// Reads and applies the document at `path`.
    pub fn deserialize_from_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<AssetHandle, AssetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.deserialize_from_str(&text)
    }

    // --- Listeners ---

    /// Listeners notified when a document introduces a new asset.
    pub fn on_asset_created(&mut self) -> &mut EventBus<AssetCreated> {
        &mut self.asset_created
    }

    /// Listeners notified right before an asset is erased.
    pub fn on_asset_destroyed(&mut self) -> &mut EventBus<AssetDestroyed> {
        &mut self.asset_destroyed
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new(AssetConfig::default())
    }
}

impl fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("asset_types", &self.storages.len())
            .field("assets", &self.asset_count())
            .finish()
    }
}
