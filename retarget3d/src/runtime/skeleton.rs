use crate::SkeletonData;
use glam::{Quat, Vec3};
use std::sync::Arc;

/// Mutable pose state for a single joint.
#[derive(Clone, Debug)]
pub struct Joint {
    data_index: usize,
    parent: Option<usize>,

    pub local_position: Vec3,
    pub local_rotation: Quat,

    pub world_position: Vec3,
    pub world_rotation: Quat,
}

impl Joint {
    pub fn data_index(&self) -> usize {
        self.data_index
    }

    pub fn parent_index(&self) -> Option<usize> {
        self.parent
    }
}

/// A posed skeleton instance over shared rig data.
///
/// The host owns the instance and its joint graph; the retargeter borrows it
/// per call and mutates joint transforms in place. World transforms are
/// current for the bind pose after construction; after the host writes local
/// pose values it must call [`Skeleton::update_world_transform`] before they
/// are read back in world space.
#[derive(Clone, Debug)]
pub struct Skeleton {
    pub data: Arc<SkeletonData>,
    pub joints: Vec<Joint>,
}

impl Skeleton {
    pub fn new(data: Arc<SkeletonData>) -> Self {
        let joints = data
            .joints
            .iter()
            .enumerate()
            .map(|(data_index, joint)| Joint {
                data_index,
                parent: joint.parent,
                local_position: joint.position,
                local_rotation: joint.rotation,
                world_position: joint.position,
                world_rotation: joint.rotation,
            })
            .collect::<Vec<_>>();

        let mut skeleton = Self { data, joints };
        skeleton.update_world_transform();
        skeleton
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Recompute world transforms from the local pose. Parents precede
    /// children in the joint array, so one forward pass suffices.
    pub fn update_world_transform(&mut self) {
        for index in 0..self.joints.len() {
            match self.joints[index].parent {
                Some(parent) => {
                    let (parent_rotation, parent_position) = {
                        let p = &self.joints[parent];
                        (p.world_rotation, p.world_position)
                    };
                    let joint = &mut self.joints[index];
                    joint.world_rotation = parent_rotation * joint.local_rotation;
                    joint.world_position = parent_position + parent_rotation * joint.local_position;
                }
                None => {
                    let joint = &mut self.joints[index];
                    joint.world_rotation = joint.local_rotation;
                    joint.world_position = joint.local_position;
                }
            }
        }
    }

    /// Assign a world rotation, decomposing the local rotation against the
    /// parent's current world rotation. Descendants keep their local pose;
    /// their cached world transforms refresh on the next
    /// [`Skeleton::update_world_transform`].
    pub fn set_world_rotation(&mut self, joint: usize, rotation: Quat) {
        let local = match self.joints[joint].parent {
            Some(parent) => self.joints[parent].world_rotation.inverse() * rotation,
            None => rotation,
        };
        let joint = &mut self.joints[joint];
        joint.world_rotation = rotation;
        joint.local_rotation = local;
    }

    pub fn local_position(&self, joint: usize) -> Vec3 {
        self.joints[joint].local_position
    }

    pub fn set_local_position(&mut self, joint: usize, position: Vec3) {
        self.joints[joint].local_position = position;
    }

    pub fn local_rotation(&self, joint: usize) -> Quat {
        self.joints[joint].local_rotation
    }

    pub fn set_local_rotation(&mut self, joint: usize, rotation: Quat) {
        self.joints[joint].local_rotation = rotation;
    }

    pub fn world_position(&self, joint: usize) -> Vec3 {
        self.joints[joint].world_position
    }

    pub fn world_rotation(&self, joint: usize) -> Quat {
        self.joints[joint].world_rotation
    }
}
