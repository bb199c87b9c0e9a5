//! Builds a mocap driver rig and a Mixamo-style target rig in code, drives
//! one frame of retargeting and dumps the resulting target pose.

use glam::{Quat, Vec3};
use retarget3d::{JointData, RetargetConfig, Retargeter, Skeleton, SkeletonData};
use std::sync::Arc;

fn push(joints: &mut Vec<JointData>, name: String, parent: Option<usize>, position: Vec3) -> usize {
    joints.push(JointData {
        name,
        parent,
        position,
        rotation: Quat::IDENTITY,
    });
    joints.len() - 1
}

fn humanoid(prefix: &str, root_name: &str, driver_spine: bool) -> Arc<SkeletonData> {
    let mut joints = Vec::new();
    let root = push(&mut joints, root_name.to_string(), None, Vec3::ZERO);
    let hips = push(
        &mut joints,
        format!("{prefix}Hips"),
        Some(root),
        Vec3::new(0.0, 1.0, 0.0),
    );
    let spine = push(
        &mut joints,
        format!("{prefix}Spine"),
        Some(hips),
        Vec3::new(0.0, 0.1, 0.0),
    );
    let spine1 = push(
        &mut joints,
        format!("{prefix}Spine1"),
        Some(spine),
        Vec3::new(0.0, 0.1, 0.0),
    );
    let mut top = push(
        &mut joints,
        format!("{prefix}Spine2"),
        Some(spine1),
        Vec3::new(0.0, 0.1, 0.0),
    );
    if driver_spine {
        top = push(
            &mut joints,
            format!("{prefix}Spine3"),
            Some(top),
            Vec3::new(0.0, 0.1, 0.0),
        );
    }
    let neck = push(
        &mut joints,
        format!("{prefix}Neck"),
        Some(top),
        Vec3::new(0.0, 0.15, 0.0),
    );
    push(
        &mut joints,
        format!("{prefix}Head"),
        Some(neck),
        Vec3::new(0.0, 0.12, 0.0),
    );

    for (side, sign) in [("Right", -1.0f32), ("Left", 1.0f32)] {
        let shoulder = push(
            &mut joints,
            format!("{prefix}{side}Shoulder"),
            Some(top),
            Vec3::new(sign * 0.08, 0.1, 0.0),
        );
        let arm = push(
            &mut joints,
            format!("{prefix}{side}Arm"),
            Some(shoulder),
            Vec3::new(sign * 0.12, 0.0, 0.0),
        );
        let forearm = push(
            &mut joints,
            format!("{prefix}{side}ForeArm"),
            Some(arm),
            Vec3::new(sign * 0.27, 0.0, 0.0),
        );
        push(
            &mut joints,
            format!("{prefix}{side}Hand"),
            Some(forearm),
            Vec3::new(sign * 0.25, 0.0, 0.0),
        );

        let upleg = push(
            &mut joints,
            format!("{prefix}{side}UpLeg"),
            Some(hips),
            Vec3::new(sign * 0.09, -0.05, 0.0),
        );
        let leg = push(
            &mut joints,
            format!("{prefix}{side}Leg"),
            Some(upleg),
            Vec3::new(0.0, -0.45, 0.0),
        );
        let foot = push(
            &mut joints,
            format!("{prefix}{side}Foot"),
            Some(leg),
            Vec3::new(0.0, -0.42, 0.0),
        );
        push(
            &mut joints,
            format!("{prefix}{side}ToeBase"),
            Some(foot),
            Vec3::new(0.0, -0.07, 0.13),
        );
    }

    Arc::new(SkeletonData { joints })
}

fn main() {
    let mut driver = Skeleton::new(humanoid("Robot_", "Neuron", true));
    let mut target = Skeleton::new(humanoid("mixamorig:", "Armature", false));

    let config = RetargetConfig::default();
    let mut retargeter = Retargeter::bind(&driver, &target, &config).expect("bind");

    // Crouch, drift and turn the capture performer.
    let hips = retargeter.binding().driver_hips();
    driver.set_local_position(hips, Vec3::new(0.1, 0.85, 0.3));
    driver.set_local_rotation(hips, Quat::from_rotation_y(0.4));
    driver.update_world_transform();

    retargeter.step(&driver, &mut target);
    target.update_world_transform();

    for (index, joint) in target.joints.iter().enumerate() {
        let name = &target.data.joints[index].name;
        let p = joint.world_position;
        let r = joint.world_rotation;
        println!(
            "{index:2} {name:24} pos [{:7.3} {:7.3} {:7.3}] rot [{:6.3} {:6.3} {:6.3} {:6.3}]",
            p.x, p.y, p.z, r.x, r.y, r.z, r.w
        );
    }
}
