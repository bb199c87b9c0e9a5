use crate::model::REGION_COUNT;
use crate::{Error, Region, RegionChains, Skeleton, SkeletonData};
use glam::Quat;

/// Which side of the retargeting pair a resolver is binding.
///
/// The two rigs follow different conventions: the driver rig enumerates one
/// extra spine link and carries its own finger and in-hand joints inside the
/// arm subtrees, while the target rig's arm chains are built explicitly.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RigRole {
    Driver,
    Target,
}

/// Spine links walked as named children from the hips, in order.
const SPINE_LINKS: [&str; 3] = ["Spine", "Spine1", "Spine2"];
const DRIVER_SPINE_LINKS: [&str; 4] = ["Spine", "Spine1", "Spine2", "Spine3"];

/// Finger chains rooted at the hand. Each finger has four numbered segments;
/// the first is parented at the hand, each later one at the previous segment.
const FINGERS: [&str; 5] = ["Thumb", "Index", "Middle", "Ring", "Pinky"];
const FINGER_SEGMENTS: usize = 4;

/// Locates joints by depth-first search under a naming convention
/// (`prefix + "Hips"`, `prefix + "RightUpLeg"`, ...).
#[derive(Clone, Debug)]
pub struct PrefixNameResolver {
    pub prefix: String,
    pub include_fingers: bool,
}

impl PrefixNameResolver {
    pub fn new(prefix: impl Into<String>, include_fingers: bool) -> Self {
        Self {
            prefix: prefix.into(),
            include_fingers,
        }
    }

    pub fn resolve(&self, data: &SkeletonData, role: RigRole) -> Result<RegionChains, Error> {
        let root = data.root().ok_or_else(|| Error::JointNotFound {
            name: format!("{}Hips", self.prefix),
            parent: "<empty skeleton>".to_string(),
        })?;

        let mut chains = RegionChains::new();

        let hips = self.search(data, root, "Hips")?;
        let spine_links: &[&str] = match role {
            RigRole::Driver => &DRIVER_SPINE_LINKS,
            RigRole::Target => &SPINE_LINKS,
        };
        let mut main_body = vec![hips];
        let mut cursor = hips;
        for link in spine_links {
            cursor = self.child(data, cursor, link)?;
            main_body.push(cursor);
        }
        chains.set(Region::MainBody, main_body);

        chains.set(Region::Neck, vec![self.search(data, root, "Neck")?]);
        chains.set(Region::Head, vec![self.search(data, root, "Head")?]);

        for (region, side) in [(Region::RightArm, "Right"), (Region::LeftArm, "Left")] {
            let shoulder = self.search(data, root, &format!("{side}Shoulder"))?;
            let chain = match role {
                // The mocap rig's hand joints pair up positionally with the
                // target chain, so the whole subtree is captured.
                RigRole::Driver => data.subtree(shoulder),
                RigRole::Target => self.arm_chain(data, shoulder, side)?,
            };
            chains.set(region, chain);
        }

        // Legs are the entire child subtree so intermediate joints (toes,
        // heel rolls) retarget too.
        for (region, side) in [(Region::RightLeg, "Right"), (Region::LeftLeg, "Left")] {
            let leg = self.search(data, root, &format!("{side}UpLeg"))?;
            chains.set(region, data.subtree(leg));
        }

        Ok(chains)
    }

    fn arm_chain(&self, data: &SkeletonData, shoulder: usize, side: &str) -> Result<Vec<usize>, Error> {
        let mut chain = vec![shoulder];
        let mut cursor = shoulder;
        for link in [
            format!("{side}Arm"),
            format!("{side}ForeArm"),
            format!("{side}Hand"),
        ] {
            cursor = self.child(data, cursor, &link)?;
            chain.push(cursor);
        }

        if self.include_fingers {
            let hand = cursor;
            for finger in FINGERS {
                let mut parent = hand;
                for segment in 1..=FINGER_SEGMENTS {
                    let joint =
                        self.child(data, parent, &format!("{side}Hand{finger}{segment}"))?;
                    chain.push(joint);
                    parent = joint;
                }
            }
        }

        Ok(chain)
    }

    fn search(&self, data: &SkeletonData, root: usize, suffix: &str) -> Result<usize, Error> {
        let name = format!("{}{}", self.prefix, suffix);
        data.find_descendant(root, &name)
            .ok_or_else(|| Error::JointNotFound {
                name,
                parent: data.joints[root].name.clone(),
            })
    }

    fn child(&self, data: &SkeletonData, parent: usize, suffix: &str) -> Result<usize, Error> {
        let name = format!("{}{}", self.prefix, suffix);
        data.find_child(parent, &name)
            .ok_or_else(|| Error::JointNotFound {
                name,
                parent: data.joints[parent].name.clone(),
            })
    }
}

/// Caller-supplied joint lists, validated once at bind time.
#[derive(Clone, Debug)]
pub struct ExplicitMappingResolver {
    pub chains: RegionChains,
}

impl ExplicitMappingResolver {
    pub fn new(chains: RegionChains) -> Self {
        Self { chains }
    }

    pub fn resolve(&self, data: &SkeletonData) -> Result<RegionChains, Error> {
        for region in Region::ALL {
            let chain = self.chains.get(region);
            for &joint in chain {
                if joint >= data.joints.len() {
                    return Err(Error::InvalidMapping {
                        region: region.name().to_string(),
                        message: format!(
                            "joint index {joint} out of range ({} joints)",
                            data.joints.len()
                        ),
                    });
                }
            }
            match region {
                Region::MainBody if chain.is_empty() => {
                    return Err(Error::InvalidMapping {
                        region: region.name().to_string(),
                        message: "requires at least the root joint".to_string(),
                    });
                }
                // Neck and head are dereferenced unconditionally every frame.
                Region::Neck | Region::Head if chain.len() != 1 => {
                    return Err(Error::InvalidMapping {
                        region: region.name().to_string(),
                        message: format!("expected exactly one joint, got {}", chain.len()),
                    });
                }
                _ => {}
            }
        }
        Ok(self.chains.clone())
    }
}

/// Joint-resolution strategy, chosen per skeleton at bind time.
#[derive(Clone, Debug)]
pub enum JointResolver {
    PrefixName(PrefixNameResolver),
    ExplicitMapping(ExplicitMappingResolver),
}

impl JointResolver {
    pub fn resolve(&self, data: &SkeletonData, role: RigRole) -> Result<RegionChains, Error> {
        match self {
            Self::PrefixName(resolver) => resolver.resolve(data, role),
            Self::ExplicitMapping(resolver) => resolver.resolve(data),
        }
    }
}

/// Resolved chains and bind-time calibration for one driver/target pair.
///
/// Immutable once built; rebinding replaces the whole value.
#[derive(Clone, Debug)]
pub struct Binding {
    driver: RegionChains,
    target: RegionChains,
    /// Per-region, per-target-joint rotation offsets captured at bind time:
    /// `inverse(reference) * joint.world_rotation` with the target root's
    /// world rotation as the shared reference.
    offsets: [Vec<Quat>; REGION_COUNT],
    target_model_root: usize,
}

impl Binding {
    /// Resolve both skeletons and capture the per-joint rotation offsets.
    ///
    /// Fails atomically: any missing joint or invalid mapping yields an
    /// error and no binding.
    pub fn new(
        driver: &Skeleton,
        target: &Skeleton,
        driver_resolver: &JointResolver,
        target_resolver: &JointResolver,
    ) -> Result<Self, Error> {
        let driver_chains = driver_resolver.resolve(&driver.data, RigRole::Driver)?;
        let target_chains = target_resolver.resolve(&target.data, RigRole::Target)?;

        let target_model_root = target.data.root().ok_or_else(|| Error::InvalidMapping {
            region: Region::MainBody.name().to_string(),
            message: "target skeleton has no root joint".to_string(),
        })?;

        let inverse_reference = target.world_rotation(target_model_root).inverse();
        let offsets: [Vec<Quat>; REGION_COUNT] = std::array::from_fn(|index| {
            target_chains
                .get(Region::ALL[index])
                .iter()
                .map(|&joint| inverse_reference * target.world_rotation(joint))
                .collect()
        });

        log::debug!(
            "bound {} driver joints to {} target joints",
            driver_chains.joint_count(),
            target_chains.joint_count(),
        );

        Ok(Self {
            driver: driver_chains,
            target: target_chains,
            offsets,
            target_model_root,
        })
    }

    pub fn driver_chains(&self) -> &RegionChains {
        &self.driver
    }

    pub fn target_chains(&self) -> &RegionChains {
        &self.target
    }

    pub fn offsets(&self, region: Region) -> &[Quat] {
        &self.offsets[region.index()]
    }

    /// The driver rig's hips joint.
    pub fn driver_hips(&self) -> usize {
        self.driver.get(Region::MainBody)[0]
    }

    /// The target rig's hips joint.
    pub fn target_hips(&self) -> usize {
        self.target.get(Region::MainBody)[0]
    }

    /// The target model's root transform (the shared rotation reference).
    pub fn target_model_root(&self) -> usize {
        self.target_model_root
    }
}
