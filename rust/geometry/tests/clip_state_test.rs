// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use boxclip_geometry::{
    Category, ClipScene, ClipSettings, ClipStateEvaluator, Consumer, Frame, Matrix4,
    OrientedBox, OverrideValue, Vector3,
};

fn placed(size: Vector3<f64>, x: f64, y: f64, z: f64) -> OrientedBox {
    OrientedBox::new(size, Matrix4::new_translation(&Vector3::new(x, y, z)))
}

fn authored_scene() -> ClipScene {
    let mut scene = ClipScene::new();
    scene.add_box(Category::ClipShow, placed(Vector3::new(2.0, 2.0, 1.0), 0.0, 1.0, 0.0));
    scene.add_box(
        Category::HideVolume,
        placed(Vector3::new(1.0, 1.0, 3.0), 0.0, 0.0, 2.0).two_sided(true),
    );
    scene.add_box(
        Category::ZCompress,
        placed(Vector3::new(1.0, 1.0, 0.5), 0.0, 0.0, 0.0).active(false),
    );
    scene.reconcile();
    scene
}

#[test]
fn scene_to_overrides() {
    let scene = authored_scene();
    let mut evaluator = ClipStateEvaluator::new();
    let skinned = evaluator.track(Consumer::Deformable {
        frame: Frame::identity(),
        root: Some(Frame::from_translation(0.0, 1.0, 0.0)),
    });

    let settings = ClipSettings {
        scale: 2.0,
        scale_clip_planes: true,
        allow_in_front: 0.25,
        preview: true,
    };
    let report = evaluator.tick(&scene, &settings);
    assert_eq!(report.evaluated, 1);

    let overrides = evaluator.overrides(skinned).expect("overrides written");
    assert_eq!(overrides.categories[Category::ClipShow].len(), 1);
    assert_eq!(overrides.categories[Category::HideVolume].len(), 2);
    assert_eq!(overrides.categories[Category::ZCompress].len(), 0);

    // Thin box was reconciled from depth 1 to 0.001 and packs it raw
    let show = overrides.categories[Category::ClipShow].as_slice()[0];
    assert_relative_eq!(show.packed_depth(), 0.001, epsilon = 1e-7);
    // Root frame cancels the box's translation; planes are halved by scale
    assert_relative_eq!(show.position.x, 0.5);
    assert_relative_eq!(show.position.y, -0.5);
    assert_relative_eq!(show.ba_scale(), 1.0);

    // Thick box packs projected depth, scaled with the clip planes
    let hide = overrides.categories[Category::HideVolume].as_slice()[0];
    assert_relative_eq!(hide.packed_depth(), 1.5);

    let props = overrides.properties();
    let scale = props
        .iter()
        .find(|(name, _)| name == "_BoxClipScale")
        .map(|(_, value)| value.clone());
    assert_eq!(scale, Some(OverrideValue::Float(2.0)));
}

#[test]
fn untracking_drops_overrides() {
    let scene = authored_scene();
    let mut evaluator = ClipStateEvaluator::new();
    let id = evaluator.track(Consumer::Renderer {
        frame: Frame::identity(),
    });
    let settings = ClipSettings {
        preview: true,
        ..ClipSettings::default()
    };
    evaluator.tick(&scene, &settings);
    assert_eq!(evaluator.override_count(), 1);
    assert!(evaluator.untrack(id).is_some());
    assert_eq!(evaluator.override_count(), 0);
    assert_eq!(evaluator.tick(&scene, &settings).evaluated, 0);
}
