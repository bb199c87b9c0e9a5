use glam::{Quat, Vec3};

pub(crate) const REGION_COUNT: usize = 7;

/// Bind-pose definition of a single joint in the rig hierarchy.
///
/// Joints are stored in an array with parents preceding children, so world
/// transforms resolve in a single forward pass.
#[derive(Clone, Debug)]
pub struct JointData {
    pub name: String,
    pub parent: Option<usize>,
    /// Local position relative to the parent joint.
    pub position: Vec3,
    /// Local rotation relative to the parent joint (unit quaternion).
    pub rotation: Quat,
}

/// Immutable rig description shared between skeleton instances.
///
/// The topology queries are only used while binding; the per-frame path works
/// on resolved joint indices.
#[derive(Clone, Debug, Default)]
pub struct SkeletonData {
    pub joints: Vec<JointData>,
}

impl SkeletonData {
    /// First joint without a parent, i.e. the model root transform.
    pub fn root(&self) -> Option<usize> {
        self.joints.iter().position(|joint| joint.parent.is_none())
    }

    /// Children of `parent` in index (insertion) order.
    pub fn children(&self, parent: usize) -> impl Iterator<Item = usize> + '_ {
        self.joints
            .iter()
            .enumerate()
            .filter(move |(_, joint)| joint.parent == Some(parent))
            .map(|(index, _)| index)
    }

    /// Direct child of `parent` with the given name.
    pub fn find_child(&self, parent: usize, name: &str) -> Option<usize> {
        self.children(parent)
            .find(|&child| self.joints[child].name == name)
    }

    /// Depth-first preorder search of the subtree rooted at `start`,
    /// including `start` itself.
    pub fn find_descendant(&self, start: usize, name: &str) -> Option<usize> {
        if self.joints.get(start)?.name == name {
            return Some(start);
        }
        for child in self.children(start) {
            if let Some(found) = self.find_descendant(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Depth-first preorder enumeration of the subtree rooted at `root`,
    /// including `root` itself.
    pub fn subtree(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_subtree(root, &mut out);
        out
    }

    fn collect_subtree(&self, joint: usize, out: &mut Vec<usize>) {
        out.push(joint);
        for child in self.children(joint) {
            self.collect_subtree(child, out);
        }
    }
}

/// The seven retargeted body regions.
///
/// Neck and head are chains of exactly one joint; the other regions are
/// variable-length chains paired by index between the two rigs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Region {
    MainBody,
    Neck,
    Head,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

impl Region {
    pub const ALL: [Region; REGION_COUNT] = [
        Region::MainBody,
        Region::Neck,
        Region::Head,
        Region::RightArm,
        Region::LeftArm,
        Region::RightLeg,
        Region::LeftLeg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::MainBody => "main body",
            Self::Neck => "neck",
            Self::Head => "head",
            Self::RightArm => "right arm",
            Self::LeftArm => "left arm",
            Self::RightLeg => "right leg",
            Self::LeftLeg => "left leg",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::MainBody => 0,
            Self::Neck => 1,
            Self::Head => 2,
            Self::RightArm => 3,
            Self::LeftArm => 4,
            Self::RightLeg => 5,
            Self::LeftLeg => 6,
        }
    }
}

/// Ordered joint-index lists for each body region, resolved on one skeleton.
#[derive(Clone, Debug)]
pub struct RegionChains {
    chains: [Vec<usize>; REGION_COUNT],
}

impl Default for RegionChains {
    fn default() -> Self {
        Self {
            chains: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl RegionChains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, region: Region) -> &[usize] {
        &self.chains[region.index()]
    }

    pub fn set(&mut self, region: Region, chain: Vec<usize>) {
        self.chains[region.index()] = chain;
    }

    /// Total joint count across all regions.
    pub fn joint_count(&self) -> usize {
        self.chains.iter().map(Vec::len).sum()
    }
}
