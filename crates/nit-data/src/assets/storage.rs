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

use super::{AssetError, AssetTypeArgs};
use crate::pool::{IdMode, Pool};
use nit_core::asset::{Asset, AssetId, AssetInfo};
use nit_core::TypeInfo;
use serde_json::Value;
use std::any::Any;

/// What applying a document did to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Applied {
    /// The id was new; a slot was created.
    Created,
    /// The id existed; its data was replaced in place.
    Replaced,
}

/// The type-erased interface the registry uses to drive one asset pool.
pub(crate) trait AssetStorage {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn type_info(&self) -> TypeInfo;

    fn version(&self) -> u32;

    fn contains(&self, id: AssetId) -> bool;

    fn info(&self, id: AssetId) -> Option<&AssetInfo>;

    fn info_mut(&mut self, id: AssetId) -> Option<&mut AssetInfo>;

    /// Metadata in dense order.
    fn infos(&self) -> &[AssetInfo];

    /// Runs the load hook and marks the asset loaded.
    fn load(&mut self, id: AssetId);

    /// Runs the free hook if the asset is loaded, then marks it unloaded with
    /// no references.
    fn free(&mut self, id: AssetId);

    fn serialize(&self, id: AssetId) -> Result<Value, AssetError>;

    /// Inserts or replaces the asset described by `info`.
    ///
    /// The payload is decoded into a fresh value before anything is touched,
    /// so a hook failure leaves the pool as it was. Replacing a loaded asset
    /// frees the old value and loads the new one, keeping its reference count.
    fn apply_document(&mut self, info: AssetInfo, payload: Value) -> Result<Applied, AssetError>;

    fn remove(&mut self, id: AssetId) -> Result<(), AssetError>;
}

/// The pool of one asset type with the metadata of each asset.
///
/// `infos[slot]` describes the asset whose data is `pool.values()[slot]`.
pub(crate) struct TypedAssets<T> {
    pub(crate) pool: Pool<T>,
    infos: Vec<AssetInfo>,
    args: AssetTypeArgs<T>,
}

impl<T: Asset> TypedAssets<T> {
    pub(crate) fn new(
        type_info: TypeInfo,
        capacity: u32,
        args: AssetTypeArgs<T>,
    ) -> Result<Self, AssetError> {
        Ok(Self {
            pool: Pool::with_type_info(type_info, capacity, IdMode::SelfManaged, args.growth)?,
            infos: Vec::with_capacity(capacity as usize),
            args,
        })
    }

    /// Stores `data` under a fresh id and records its metadata.
    pub(crate) fn create(
        &mut self,
        name: String,
        path: String,
        data: T,
    ) -> Result<AssetId, AssetError> {
        let (id, _) = self.pool.insert_new(data)?;
        let type_name = self.pool.type_info().name;
        self.infos
            .push(AssetInfo::new(type_name, id, name, path, self.args.version));
        Ok(id)
    }

    fn slot(&self, id: AssetId) -> Option<usize> {
        self.pool.slot_of(id).map(|slot| slot as usize)
    }

    fn hook_missing(&self, hook: &'static str) -> AssetError {
        AssetError::MissingHook {
            type_name: self.pool.type_info().name,
            hook,
        }
    }
}

impl<T: Asset> AssetStorage for TypedAssets<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_info(&self) -> TypeInfo {
        self.pool.type_info()
    }

    fn version(&self) -> u32 {
        self.args.version
    }

    fn contains(&self, id: AssetId) -> bool {
        self.pool.contains(id)
    }

    fn info(&self, id: AssetId) -> Option<&AssetInfo> {
        self.infos.get(self.slot(id)?)
    }

    fn info_mut(&mut self, id: AssetId) -> Option<&mut AssetInfo> {
        let slot = self.slot(id)?;
        self.infos.get_mut(slot)
    }

    fn infos(&self) -> &[AssetInfo] {
        &self.infos
    }

    fn load(&mut self, id: AssetId) {
        let Some(slot) = self.slot(id) else {
            return;
        };
        if let Some(load) = self.args.load {
            load(&mut self.pool.values_mut()[slot]);
        }
        self.infos[slot].loaded = true;
    }

    fn free(&mut self, id: AssetId) {
        let Some(slot) = self.slot(id) else {
            return;
        };
        if self.infos[slot].loaded {
            if let Some(free) = self.args.free {
                free(&mut self.pool.values_mut()[slot]);
            }
        }
        let info = &mut self.infos[slot];
        info.loaded = false;
        info.reference_count = 0;
    }

    fn serialize(&self, id: AssetId) -> Result<Value, AssetError> {
        let serialize = self.args.serialize.ok_or_else(|| self.hook_missing("serialize"))?;
        let data = self
            .pool
            .get(id)
            .ok_or_else(|| AssetError::MalformedDocument(format!("no asset with id {id}")))?;
        Ok(serialize(data)?)
    }

    fn apply_document(&mut self, info: AssetInfo, payload: Value) -> Result<Applied, AssetError> {
        let deserialize = self
            .args
            .deserialize
            .ok_or_else(|| self.hook_missing("deserialize"))?;
        let mut data = T::default();
        deserialize(&mut data, payload)?;

        let Some(slot) = self.slot(info.id) else {
            self.pool.insert_with_id(info.id, data)?;
            self.infos.push(AssetInfo {
                loaded: false,
                reference_count: 0,
                ..info
            });
            return Ok(Applied::Created);
        };

        let was_loaded = self.infos[slot].loaded;
        let reference_count = self.infos[slot].reference_count;
        if was_loaded {
            self.free(info.id);
        }
        self.pool.values_mut()[slot] = data;
        self.infos[slot] = AssetInfo {
            loaded: false,
            reference_count,
            ..info
        };
        if was_loaded {
            self.load(info.id);
        }
        Ok(Applied::Replaced)
    }

    fn remove(&mut self, id: AssetId) -> Result<(), AssetError> {
        let deletion = self.pool.delete(id)?;
        self.infos.swap_remove(deletion.deleted_slot as usize);
        Ok(())
    }
}
