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

use super::*;
use nit_core::asset::{Asset, AssetCreated, AssetDestroyed, AssetHandle};
use nit_core::config::AssetConfig;
use serde::{Deserialize, Serialize};

// --- DUMMY ASSETS FOR TESTING ---

/// Counts hook calls in the value itself, since hooks are plain functions.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Texture2D {
    width: u32,
    height: u32,
    #[serde(skip)]
    loads: u32,
    #[serde(skip)]
    frees: u32,
    #[serde(skip)]
    gpu_resident: bool,
}
impl Asset for Texture2D {}

fn upload(texture: &mut Texture2D) {
    texture.loads += 1;
    texture.gpu_resident = true;
}

fn evict(texture: &mut Texture2D) {
    texture.frees += 1;
    texture.gpu_resident = false;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Script {
    source: String,
}
impl Asset for Script {}

fn texture(width: u32, height: u32) -> Texture2D {
    Texture2D {
        width,
        height,
        ..Texture2D::default()
    }
}

fn registry() -> AssetRegistry {
    let mut registry = AssetRegistry::new(AssetConfig::default());
    registry
        .register_type(
            AssetTypeArgs::<Texture2D>::serde()
                .with_capacity(10)
                .with_load(upload)
                .with_free(evict),
        )
        .unwrap();
    registry
        .register_type(AssetTypeArgs::<Script>::serde().with_version(3))
        .unwrap();
    registry
}

fn data(registry: &AssetRegistry, handle: &AssetHandle) -> Texture2D {
    registry.get::<Texture2D>(handle).cloned().unwrap()
}

// --- TESTS ---

#[test]
fn test_register_type_twice_is_rejected() {
    let mut registry = registry();
    assert!(matches!(
        registry.register_type(AssetTypeArgs::<Texture2D>::new()),
        Err(AssetError::AlreadyRegistered("Texture2D"))
    ));
    assert_eq!(registry.current_version::<Script>(), Some(3));
    assert_eq!(registry.current_version_by_name("Texture2D"), Some(1));
    assert_eq!(registry.current_version_by_name("Mesh"), None);
}

#[test]
fn test_create_asset_records_metadata() {
    let mut registry = registry();
    let handle = registry
        .create_asset("tex_a", "content", texture(64, 32))
        .unwrap();

    assert!(registry.is_valid(&handle));
    assert!(!registry.is_loaded(&handle));
    let info = registry.info(&handle).unwrap();
    assert_eq!(info.type_name, "Texture2D");
    assert_eq!(info.name, "tex_a");
    assert_eq!(
        std::path::Path::new(&info.path),
        std::path::Path::new("content").join("tex_a.nit")
    );
    assert_eq!(info.version, 1);
    assert_eq!(info.reference_count, 0);
    assert_eq!(data(&registry, &handle).width, 64);
}

#[test]
fn test_create_asset_of_unregistered_type() {
    #[derive(Default)]
    struct Mesh;
    impl Asset for Mesh {}

    let mut registry = registry();
    assert!(matches!(
        registry.create_asset("cube", "", Mesh),
        Err(AssetError::UnregisteredType(name)) if name == "Mesh"
    ));
}

#[test]
fn test_get_checks_the_handle_type() {
    let mut registry = registry();
    let handle = registry.create_asset("t", "", texture(1, 1)).unwrap();
    assert!(registry.get::<Script>(&handle).is_none());
    assert!(registry.get::<Texture2D>(&AssetHandle::invalid()).is_none());

    registry.get_mut::<Texture2D>(&handle).unwrap().width = 5;
    assert_eq!(data(&registry, &handle).width, 5);
}

#[test]
fn test_retain_release_symmetry() {
    let mut registry = registry();
    let mut handle = registry.create_asset("tex", "", texture(8, 8)).unwrap();

    // Retain then release leaves a fresh asset unloaded.
    registry.retain(&handle).unwrap();
    assert!(registry.is_loaded(&handle));
    registry.release(&mut handle, false).unwrap();
    assert!(handle.is_empty(), "Freeing resets the caller's handle");

    let mut handle = registry.find_by_name("tex").unwrap();
    assert!(!registry.is_loaded(&handle));
    assert_eq!(registry.info(&handle).unwrap().reference_count, 0);
    assert_eq!(data(&registry, &handle).loads, 1);
    assert_eq!(data(&registry, &handle).frees, 1);

    // Two retains, one release: still loaded with one reference.
    registry.retain(&handle).unwrap();
    registry.retain(&handle).unwrap();
    registry.release(&mut handle, false).unwrap();
    assert!(registry.is_loaded(&handle));
    assert_eq!(registry.info(&handle).unwrap().reference_count, 1);
    assert_eq!(data(&registry, &handle).loads, 2, "Only the first retain loads");

    // The last release frees.
    registry.release(&mut handle, false).unwrap();
    let handle = registry.find_by_name("tex").unwrap();
    assert!(!registry.is_loaded(&handle));
    assert!(!data(&registry, &handle).gpu_resident);
}

#[test]
fn test_forced_release_frees_shared_assets() {
    let mut registry = registry();
    let mut handle = registry.create_asset("tex", "", texture(8, 8)).unwrap();
    for _ in 0..3 {
        registry.retain(&handle).unwrap();
    }
    let copy = handle.clone();
    registry.release(&mut handle, true).unwrap();
    assert!(!registry.is_loaded(&copy));
    assert_eq!(registry.info(&copy).unwrap().reference_count, 0);
}

#[test]
fn test_release_of_loaded_unretained_asset_frees_it() {
    let mut registry = registry();
    let mut handle = registry.create_asset("tex", "", texture(8, 8)).unwrap();
    registry.load(&handle, false).unwrap();
    assert_eq!(registry.info(&handle).unwrap().reference_count, 0);

    let copy = handle.clone();
    registry.release(&mut handle, false).unwrap();
    assert!(!registry.is_loaded(&copy));
}

#[test]
fn test_invalid_handles_are_ignored_by_retain_and_release() {
    let mut registry = registry();
    let mut handle = AssetHandle::invalid();
    registry.retain(&handle).unwrap();
    registry.release(&mut handle, true).unwrap();

    let mut unloaded = registry.create_asset("tex", "", texture(1, 1)).unwrap();
    registry.release(&mut unloaded, false).unwrap();
    assert!(!unloaded.is_empty(), "Releasing an unloaded asset does nothing");
}

#[test]
fn test_load_is_idempotent_unless_forced() {
    let mut registry = registry();
    let handle = registry.create_asset("tex", "", texture(4, 4)).unwrap();
    registry.retain(&handle).unwrap();
    registry.retain(&handle).unwrap();

    registry.load(&handle, false).unwrap();
    assert_eq!(data(&registry, &handle).loads, 1);

    registry.load(&handle, true).unwrap();
    let reloaded = data(&registry, &handle);
    assert_eq!((reloaded.loads, reloaded.frees), (2, 1));
    assert_eq!(registry.info(&handle).unwrap().reference_count, 2);
}

#[test]
fn test_free_invalidates_and_unloads() {
    let mut registry = registry();
    let mut handle = registry.create_asset("tex", "", texture(4, 4)).unwrap();
    let copy = handle.clone();
    registry.retain(&handle).unwrap();

    registry.free(&mut handle).unwrap();

    assert_eq!(handle, AssetHandle::invalid());
    assert!(registry.is_valid(&copy), "Freeing keeps the asset itself");
    assert!(!registry.is_loaded(&copy));
    assert_eq!(registry.info(&copy).unwrap().reference_count, 0);
    assert!(matches!(
        registry.free(&mut handle),
        Err(AssetError::InvalidHandle(_))
    ));
}

#[test]
fn test_destroy_frees_then_broadcasts_then_erases() {
    let mut registry = registry();
    let destroyed = registry.on_asset_destroyed().subscribe_channel();
    let mut handle = registry.create_asset("tex", "", texture(4, 4)).unwrap();
    let other = registry.create_asset("other", "", texture(2, 2)).unwrap();
    let copy = handle.clone();
    registry.retain(&handle).unwrap();

    registry.destroy(&mut handle).unwrap();

    assert!(handle.is_empty());
    assert!(!registry.is_valid(&copy));
    assert!(registry.find_by_name("tex").is_none());
    let event: AssetDestroyed = destroyed.try_recv().unwrap();
    assert_eq!(event.handle, copy);

    // The surviving asset moved into the freed slot and is intact.
    assert_eq!(data(&registry, &other).width, 2);
    assert_eq!(registry.info(&other).unwrap().name, "other");
    assert_eq!(registry.asset_count(), 1);
}

#[test]
fn test_destroyed_ids_are_reused() {
    let mut registry = AssetRegistry::default();
    registry
        .register_type(AssetTypeArgs::<Script>::serde().with_fixed_capacity(2))
        .unwrap();
    let mut first = registry.create_asset("a", "", Script::default()).unwrap();
    registry.create_asset("b", "", Script::default()).unwrap();
    let id = first.id;

    registry.destroy(&mut first).unwrap();
    let again = registry.create_asset("c", "", Script::default()).unwrap();

    assert_eq!(again.id, id);
    assert_eq!(registry.info(&again).unwrap().name, "c");
}

#[test]
fn test_find_by_name_follows_registration_order() {
    let mut registry = registry();
    registry.create_asset("shared", "", texture(1, 1)).unwrap();
    registry.create_asset("shared", "", texture(2, 2)).unwrap();
    registry
        .create_asset("shared", "", Script { source: "x".into() })
        .unwrap();

    let first = registry.find_by_name("shared").unwrap();
    assert_eq!(first.type_name(), Some("Texture2D"));
    assert_eq!(data(&registry, &first).width, 1);

    let all = registry.find_all_by_name("shared");
    let types: Vec<_> = all.iter().filter_map(AssetHandle::type_name).collect();
    assert_eq!(types, vec!["Texture2D", "Texture2D", "Script"]);
    assert!(registry.find_by_name("missing").is_none());
}

#[test]
fn test_document_round_trip_in_memory() {
    let mut source = registry();
    let handle = source.create_asset("tex_a", "", texture(64, 64)).unwrap();
    let text = source.serialize_to_string(&handle).unwrap();

    let mut target = registry();
    let created = target.on_asset_created().subscribe_channel();
    let restored = target.deserialize_from_str(&text).unwrap();

    assert_eq!(restored.id, handle.id);
    assert_eq!(data(&target, &restored), texture(64, 64));
    let event: AssetCreated = created.try_recv().unwrap();
    assert_eq!(event.handle, restored);
}

#[test]
fn test_outdated_documents_are_refused() {
    let mut registry = registry();
    let created = registry.on_asset_created().subscribe_channel();
    let text = r#"{
        "AssetInfo": { "type_name": "Script", "name": "old", "path": "old.nit", "id": 0, "version": 2 },
        "Script": { "source": "print()" }
    }"#;

    let err = registry.deserialize_from_str(text).unwrap_err();

    assert!(matches!(
        err,
        AssetError::OutdatedAsset { found: 2, current: 3, .. }
    ));
    assert!(err.is_data_error());
    assert_eq!(registry.asset_count(), 0);
    assert!(created.is_empty());
}

#[test]
fn test_out_of_range_document_ids_are_refused() {
    let mut registry = registry();
    let created = registry.on_asset_created().subscribe_channel();
    let max_id = registry.config().max_asset_id;

    for id in [max_id, 50_000_000, u32::MAX] {
        let text = format!(
            r#"{{
                "AssetInfo": {{ "type_name": "Script", "name": "huge", "path": "huge.nit", "id": {id}, "version": 3 }},
                "Script": {{ "source": "print()" }}
            }}"#
        );
        let err = registry.deserialize_from_str(&text).unwrap_err();
        assert!(matches!(err, AssetError::MalformedDocument(_)), "id {id}: {err:?}");
        assert!(err.is_data_error());
    }

    assert_eq!(registry.asset_count(), 0);
    assert!(created.is_empty());
}

#[test]
fn test_highest_allowed_document_id_is_accepted() {
    let mut registry = AssetRegistry::new(AssetConfig {
        max_asset_id: 128,
        ..AssetConfig::default()
    });
    registry
        .register_type(AssetTypeArgs::<Script>::serde().with_version(3))
        .unwrap();
    let text = r#"{
        "AssetInfo": { "type_name": "Script", "name": "edge", "path": "edge.nit", "id": 127, "version": 3 },
        "Script": { "source": "print()" }
    }"#;

    let handle = registry.deserialize_from_str(text).unwrap();
    assert_eq!(handle.id, 127);
    assert!(registry.is_valid(&handle));
}

#[test]
fn test_unregistered_document_type() {
    let mut registry = registry();
    let text = r#"{
        "AssetInfo": { "type_name": "Mesh", "name": "m", "path": "m.nit", "id": 0, "version": 1 },
        "Mesh": {}
    }"#;
    assert!(matches!(
        registry.deserialize_from_str(text),
        Err(AssetError::UnregisteredType(name)) if name == "Mesh"
    ));
}

#[test]
fn test_bad_payload_leaves_the_pool_untouched() {
    let mut registry = registry();
    let text = r#"{
        "AssetInfo": { "type_name": "Texture2D", "name": "t", "path": "t.nit", "id": 4, "version": 1 },
        "Texture2D": { "width": "wide" }
    }"#;
    assert!(matches!(
        registry.deserialize_from_str(text),
        Err(AssetError::Json(_))
    ));
    assert_eq!(registry.asset_count(), 0);
}

#[test]
fn test_hot_reload_replaces_data_in_place() {
    let mut registry = registry();
    let created = registry.on_asset_created().subscribe_channel();
    let handle = registry.create_asset("tex", "", texture(16, 16)).unwrap();
    registry.retain(&handle).unwrap();
    registry.retain(&handle).unwrap();

    let mut text = registry.serialize_to_string(&handle).unwrap();
    text = text.replace("\"width\": 16", "\"width\": 32");
    let reloaded = registry.deserialize_from_str(&text).unwrap();

    assert_eq!(reloaded, handle);
    assert!(created.is_empty(), "Reloading a known id is not a creation");
    assert_eq!(registry.asset_count(), 1);

    let current = data(&registry, &handle);
    assert_eq!(current.width, 32);
    assert!(current.gpu_resident, "A loaded asset is loaded again after reload");
    assert_eq!(current.loads, 1, "The new value was loaded once");
    let info = registry.info(&handle).unwrap();
    assert!(info.loaded);
    assert_eq!(info.reference_count, 2);
}

#[test]
fn test_serialize_requires_a_hook() {
    #[derive(Default)]
    struct Opaque;
    impl Asset for Opaque {}

    let mut registry = registry();
    registry
        .register_type(AssetTypeArgs::<Opaque>::new())
        .unwrap();
    let handle = registry.create_asset("o", "", Opaque).unwrap();
    assert!(matches!(
        registry.serialize_to_string(&handle),
        Err(AssetError::MissingHook { hook: "serialize", .. })
    ));
}

#[test]
fn test_fixed_capacity_pools_refuse_new_assets() {
    let mut registry = AssetRegistry::default();
    registry
        .register_type(AssetTypeArgs::<Script>::serde().with_fixed_capacity(1))
        .unwrap();
    registry
        .create_asset("one", "", Script::default())
        .unwrap();
    assert!(matches!(
        registry.create_asset("two", "", Script::default()),
        Err(AssetError::Pool(_))
    ));
}
