use crate::{
    Binding, Error, ExplicitMappingResolver, JointData, JointResolver, PrefixNameResolver, Region,
    RegionChains, RetargetConfig, Retargeter, RigRole, Skeleton, SkeletonData,
};
use glam::{Quat, Vec3};
use std::sync::Arc;

fn assert_quat_approx(actual: Quat, expected: Quat) {
    let dot = actual.dot(expected).abs();
    assert!(
        dot > 1.0 - 1.0e-5,
        "expected {expected:?}, got {actual:?} (dot {dot})"
    );
}

fn push(joints: &mut Vec<JointData>, name: String, parent: Option<usize>) -> usize {
    joints.push(JointData {
        name,
        parent,
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    });
    joints.len() - 1
}

/// A named humanoid rig following the prefix convention. `driver_spine` adds
/// the extra Spine3 link, `with_fingers` adds five four-segment finger chains
/// per hand.
fn humanoid(prefix: &str, driver_spine: bool, with_neck: bool, with_fingers: bool) -> SkeletonData {
    let mut joints = Vec::new();
    let root = push(&mut joints, "Armature".to_string(), None);
    let hips = push(&mut joints, format!("{prefix}Hips"), Some(root));
    let spine = push(&mut joints, format!("{prefix}Spine"), Some(hips));
    let spine1 = push(&mut joints, format!("{prefix}Spine1"), Some(spine));
    let mut top = push(&mut joints, format!("{prefix}Spine2"), Some(spine1));
    if driver_spine {
        top = push(&mut joints, format!("{prefix}Spine3"), Some(top));
    }
    let neck_or_top = if with_neck {
        push(&mut joints, format!("{prefix}Neck"), Some(top))
    } else {
        top
    };
    push(&mut joints, format!("{prefix}Head"), Some(neck_or_top));

    for side in ["Right", "Left"] {
        let shoulder = push(&mut joints, format!("{prefix}{side}Shoulder"), Some(top));
        let arm = push(&mut joints, format!("{prefix}{side}Arm"), Some(shoulder));
        let forearm = push(&mut joints, format!("{prefix}{side}ForeArm"), Some(arm));
        let hand = push(&mut joints, format!("{prefix}{side}Hand"), Some(forearm));
        if with_fingers {
            for finger in ["Thumb", "Index", "Middle", "Ring", "Pinky"] {
                let mut parent = hand;
                for segment in 1..=4 {
                    parent = push(
                        &mut joints,
                        format!("{prefix}{side}Hand{finger}{segment}"),
                        Some(parent),
                    );
                }
            }
        }

        let upleg = push(&mut joints, format!("{prefix}{side}UpLeg"), Some(hips));
        let leg = push(&mut joints, format!("{prefix}{side}Leg"), Some(upleg));
        let foot = push(&mut joints, format!("{prefix}{side}Foot"), Some(leg));
        push(&mut joints, format!("{prefix}{side}ToeBase"), Some(foot));
    }

    SkeletonData { joints }
}

fn chain_names<'a>(data: &'a SkeletonData, chain: &[usize]) -> Vec<&'a str> {
    chain.iter().map(|&j| data.joints[j].name.as_str()).collect()
}

#[test]
fn target_prefix_discovery_resolves_all_regions() {
    let data = Arc::new(humanoid("mixamorig:", false, true, false));
    let resolver = PrefixNameResolver::new("mixamorig:", false);
    let chains = resolver.resolve(&data, RigRole::Target).unwrap();

    assert_eq!(
        chain_names(&data, chains.get(Region::MainBody)),
        [
            "mixamorig:Hips",
            "mixamorig:Spine",
            "mixamorig:Spine1",
            "mixamorig:Spine2",
        ]
    );
    assert_eq!(
        chain_names(&data, chains.get(Region::Neck)),
        ["mixamorig:Neck"]
    );
    assert_eq!(
        chain_names(&data, chains.get(Region::Head)),
        ["mixamorig:Head"]
    );
    assert_eq!(
        chain_names(&data, chains.get(Region::RightArm)),
        [
            "mixamorig:RightShoulder",
            "mixamorig:RightArm",
            "mixamorig:RightForeArm",
            "mixamorig:RightHand",
        ]
    );
    assert_eq!(
        chain_names(&data, chains.get(Region::LeftLeg)),
        [
            "mixamorig:LeftUpLeg",
            "mixamorig:LeftLeg",
            "mixamorig:LeftFoot",
            "mixamorig:LeftToeBase",
        ]
    );
}

#[test]
fn driver_discovery_walks_the_extra_spine_link() {
    let data = Arc::new(humanoid("Robot_", true, true, false));
    let chains = PrefixNameResolver::new("Robot_", false)
        .resolve(&data, RigRole::Driver)
        .unwrap();

    let main_body = chains.get(Region::MainBody);
    assert_eq!(main_body.len(), 5);
    assert_eq!(data.joints[main_body[4]].name, "Robot_Spine3");
}

#[test]
fn driver_arm_chains_capture_the_whole_subtree() {
    let data = Arc::new(humanoid("Robot_", true, true, true));
    let chains = PrefixNameResolver::new("Robot_", false)
        .resolve(&data, RigRole::Driver)
        .unwrap();

    let right_arm = chains.get(Region::RightArm);
    assert_eq!(right_arm.len(), 24);
    assert_eq!(data.joints[right_arm[0]].name, "Robot_RightShoulder");
    assert!(
        right_arm
            .iter()
            .any(|&j| data.joints[j].name == "Robot_RightHandPinky4")
    );
}

#[test]
fn finger_table_parents_each_finger_at_the_hand() {
    let data = Arc::new(humanoid("mixamorig:", false, true, true));
    let chains = PrefixNameResolver::new("mixamorig:", true)
        .resolve(&data, RigRole::Target)
        .unwrap();

    let arm = chains.get(Region::RightArm);
    assert_eq!(arm.len(), 24);

    let hand = arm[3];
    assert_eq!(data.joints[hand].name, "mixamorig:RightHand");
    // Finger roots attach to the hand, not to each other; later segments
    // chain off the previous one.
    for finger_start in [4, 8, 12, 16, 20] {
        assert_eq!(data.joints[arm[finger_start]].parent, Some(hand));
        assert_eq!(
            data.joints[arm[finger_start + 1]].parent,
            Some(arm[finger_start])
        );
    }
}

#[test]
fn missing_neck_fails_with_joint_not_found() {
    let data = Arc::new(humanoid("mixamorig:", false, false, false));
    let err = PrefixNameResolver::new("mixamorig:", false)
        .resolve(&data, RigRole::Target)
        .unwrap_err();
    assert!(matches!(err, Error::JointNotFound { name, .. } if name == "mixamorig:Neck"));
}

#[test]
fn missing_finger_segment_fails_when_fingers_requested() {
    let data = Arc::new(humanoid("mixamorig:", false, true, false));
    let err = PrefixNameResolver::new("mixamorig:", true)
        .resolve(&data, RigRole::Target)
        .unwrap_err();
    assert!(matches!(err, Error::JointNotFound { name, .. } if name == "mixamorig:RightHandThumb1"));
}

#[test]
fn bind_failure_is_atomic() {
    let driver = Skeleton::new(Arc::new(humanoid("Robot_", true, true, false)));
    let target = Skeleton::new(Arc::new(humanoid("mixamorig:", false, false, false)));

    let err = Retargeter::bind(&driver, &target, &RetargetConfig::default()).unwrap_err();
    assert!(matches!(err, Error::JointNotFound { name, .. } if name == "mixamorig:Neck"));
}

#[test]
fn bind_rejects_manual_mapping_config() {
    let driver = Skeleton::new(Arc::new(humanoid("Robot_", true, true, false)));
    let target = Skeleton::new(Arc::new(humanoid("mixamorig:", false, true, false)));

    let config = RetargetConfig {
        use_name_prefix_discovery: false,
        ..RetargetConfig::default()
    };
    let err = Retargeter::bind(&driver, &target, &config).unwrap_err();
    assert!(matches!(err, Error::ManualMappingRequired));
}

#[test]
fn explicit_mapping_rejects_empty_main_body() {
    let data = Arc::new(humanoid("mixamorig:", false, true, false));
    let err = ExplicitMappingResolver::new(RegionChains::new())
        .resolve(&data)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidMapping { region, .. } if region == "main body"));
}

#[test]
fn explicit_mapping_rejects_multi_joint_neck() {
    let data = Arc::new(humanoid("mixamorig:", false, true, false));
    let mut chains = RegionChains::new();
    chains.set(Region::MainBody, vec![1]);
    chains.set(Region::Neck, vec![5, 6]);
    let err = ExplicitMappingResolver::new(chains).resolve(&data).unwrap_err();
    assert!(matches!(err, Error::InvalidMapping { region, .. } if region == "neck"));
}

#[test]
fn explicit_mapping_rejects_out_of_range_indices() {
    let data = Arc::new(humanoid("mixamorig:", false, true, false));
    let mut chains = RegionChains::new();
    chains.set(Region::MainBody, vec![999]);
    let err = ExplicitMappingResolver::new(chains).resolve(&data).unwrap_err();
    assert!(matches!(err, Error::InvalidMapping { region, message }
        if region == "main body" && message.contains("out of range")));
}

fn mini_rig(root_rotation: Quat, hips_rotation: Quat) -> (Arc<SkeletonData>, RegionChains) {
    let joints = vec![
        JointData {
            name: "Root".to_string(),
            parent: None,
            position: Vec3::ZERO,
            rotation: root_rotation,
        },
        JointData {
            name: "Hips".to_string(),
            parent: Some(0),
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: hips_rotation,
        },
        JointData {
            name: "Spine".to_string(),
            parent: Some(1),
            position: Vec3::new(0.0, 0.2, 0.0),
            rotation: Quat::IDENTITY,
        },
        JointData {
            name: "Neck".to_string(),
            parent: Some(2),
            position: Vec3::new(0.0, 0.2, 0.0),
            rotation: Quat::IDENTITY,
        },
        JointData {
            name: "Head".to_string(),
            parent: Some(3),
            position: Vec3::new(0.0, 0.1, 0.0),
            rotation: Quat::IDENTITY,
        },
        JointData {
            name: "RightArm".to_string(),
            parent: Some(2),
            position: Vec3::new(-0.3, 0.1, 0.0),
            rotation: Quat::IDENTITY,
        },
        JointData {
            name: "LeftArm".to_string(),
            parent: Some(2),
            position: Vec3::new(0.3, 0.1, 0.0),
            rotation: Quat::IDENTITY,
        },
        JointData {
            name: "RightLeg".to_string(),
            parent: Some(1),
            position: Vec3::new(-0.2, -0.1, 0.0),
            rotation: Quat::IDENTITY,
        },
        JointData {
            name: "LeftLeg".to_string(),
            parent: Some(1),
            position: Vec3::new(0.2, -0.1, 0.0),
            rotation: Quat::IDENTITY,
        },
    ];

    let mut chains = RegionChains::new();
    chains.set(Region::MainBody, vec![1, 2]);
    chains.set(Region::Neck, vec![3]);
    chains.set(Region::Head, vec![4]);
    chains.set(Region::RightArm, vec![5]);
    chains.set(Region::LeftArm, vec![6]);
    chains.set(Region::RightLeg, vec![7]);
    chains.set(Region::LeftLeg, vec![8]);

    (Arc::new(SkeletonData { joints }), chains)
}

#[test]
fn bind_offsets_are_relative_to_the_root_reference() {
    let root_rotation = Quat::from_rotation_y(0.7);
    let hips_rotation = Quat::from_rotation_x(0.3);
    let (target_data, chains) = mini_rig(root_rotation, hips_rotation);
    let (driver_data, _) = mini_rig(Quat::IDENTITY, Quat::IDENTITY);

    let driver = Skeleton::new(driver_data);
    let target = Skeleton::new(target_data);
    let resolver = JointResolver::ExplicitMapping(ExplicitMappingResolver::new(chains));

    let binding = Binding::new(&driver, &target, &resolver, &resolver).unwrap();

    // The root rotation cancels out of the reference, so the hips offset is
    // exactly the hips' own bind rotation.
    assert_quat_approx(binding.offsets(Region::MainBody)[0], hips_rotation);
    assert_quat_approx(binding.offsets(Region::Neck)[0], hips_rotation);
    assert_eq!(binding.driver_hips(), 1);
    assert_eq!(binding.target_hips(), 1);
    assert_eq!(binding.target_model_root(), 0);
}
