// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use boxclip_assets::{
    AssetStore, Error, GenerationTarget, MaterialData, ProvenanceCache, ShaderSet,
};

#[test]
fn manage_all_then_group_by_shader() {
    let mut store = AssetStore::new();
    store.add_folder("Assets/Generated");
    let standard = store.add_shader("Standard", "Resources/unity_builtin_extra", "");
    let unlit = store.add_shader("Unlit/Texture", "Resources/unity_builtin_extra", "");
    let clip_standard = store.add_shader(
        "BoxClip/Standard",
        "Assets/BoxClip/Shaders/Standard.shader",
        "",
    );

    let body = store.add_material(MaterialData::new("Body", "Assets/Body.mat", standard));
    let hair = store.add_material(MaterialData::new("Hair", "Assets/Hair.mat", standard));
    let decal = store.add_material(MaterialData::new("Decal", "Assets/Decal.mat", unlit));

    let target = GenerationTarget::resolve(&store, "Assets/Generated").unwrap();
    let cache = ProvenanceCache::new(target);

    let result = cache.manage_all(&mut store, &[body, hair, decal, body]);
    assert!(result.report.is_success());
    assert_eq!(result.report.attempted(), 4);
    assert_eq!(result.replacements.len(), 3);

    let generated: Vec<_> = [body, hair, decal]
        .iter()
        .map(|m| result.replacements[m])
        .collect();
    let set = ShaderSet::collect(&store, &generated).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.materials(clip_standard).len(), 2);
    // No clip variant for Unlit/Texture: the generated material keeps it
    assert_eq!(set.materials(unlit), &[generated[2]]);

    // Managing again reuses every generated material
    let again = cache.manage_all(&mut store, &[body, hair, decal]);
    for origin in [body, hair, decal] {
        assert_eq!(again.replacements[&origin], result.replacements[&origin]);
    }
    assert_eq!(store.find_materials("BoxClip", "Assets/Generated").len(), 3);

    let reversed = cache.unmanage_all(&store, &generated);
    assert!(reversed.report.is_success());
    assert_eq!(reversed.replacements[&generated[0]], body);
    assert_eq!(reversed.replacements[&generated[2]], decal);
}

#[test]
fn manage_all_continues_past_unidentified_material() {
    let mut store = AssetStore::new();
    store.add_folder("Generated");
    let shader = store.add_shader("BoxClip/Standard", "Shaders/Standard.shader", "");
    let body = store.add_material(MaterialData::new("Body", "Materials/Body.mat", shader));
    let lost = store.add_material(MaterialData::new("Lost", "Materials/Lost.mat", shader));
    let hair = store.add_material(MaterialData::new("Hair", "Materials/Hair.mat", shader));
    // Moved to a path the store never registered, so it has no identity
    store.material_mut(lost).unwrap().path = "Materials/Moved/Lost.mat".to_string();

    let cache = ProvenanceCache::new(GenerationTarget::resolve(&store, "Generated").unwrap());
    let result = cache.manage_all(&mut store, &[body, lost, hair]);

    assert_eq!(result.report.completed, vec![body, hair]);
    assert_eq!(result.report.failed.len(), 1);
    assert_eq!(result.report.failed[0].0, lost);
    assert!(matches!(
        result.report.failed[0].1,
        Error::IdentityLookupFailure { ref material } if material == "Lost"
    ));
    assert_eq!(result.replacements.len(), 2);
    assert!(!result.replacements.contains_key(&lost));
}

#[test]
fn builtin_origin_resolves_after_snapshot() {
    let mut store = AssetStore::new();
    store.add_folder("Generated");
    let shader = store.add_shader("BoxClip/Standard", "Shaders/Standard.shader", "");
    let builtin = store.add_material(MaterialData::new(
        "Default-Diffuse",
        "Resources/builtin_extra",
        shader,
    ));
    let cache = ProvenanceCache::new(GenerationTarget::resolve(&store, "Generated").unwrap());
    cache.manage(&mut store, builtin).unwrap();

    let restored = AssetStore::from_json(&store.to_json().unwrap()).unwrap();
    let cache = ProvenanceCache::new(GenerationTarget::resolve(&restored, "Generated").unwrap());
    let generated = restored.find_materials("Default-Diffuse BoxClip", "Generated");
    assert_eq!(generated.len(), 1);

    let origin = cache.unmanage(&restored, generated[0]).unwrap();
    let origin = restored.material(origin).unwrap();
    assert_eq!(origin.name, "Default-Diffuse");
    assert_eq!(origin.path, "Resources/builtin_extra");
}
