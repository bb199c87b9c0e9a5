/// Recognized retargeting options.
///
/// Hosts that keep options in data files can load these from JSON with the
/// `json` feature; field names are camelCase on the wire.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default, rename_all = "camelCase"))]
pub struct RetargetConfig {
    /// Locate joints by prefixed-name discovery. When false, the host must
    /// bind with explicitly supplied resolvers.
    pub use_name_prefix_discovery: bool,
    /// Name prefix on the target rig's joints.
    pub joint_name_prefix: String,
    /// Name prefix on the driver (mocap) rig's joints.
    pub driver_name_prefix: String,
    /// Also resolve and retarget finger chains on the target rig.
    pub include_fingers: bool,
    /// Drive the target's position from the driver root.
    pub use_root_translation: bool,
    /// When root translation is off, still drive the vertical component so
    /// crouching and jumping carry over while a locomotion system keeps
    /// horizontal control.
    pub use_vertical_only_translation: bool,
    /// Reposition the whole model transform instead of the root joint.
    /// Useful when the model carries a collider and controller scripts.
    pub reposition_whole_model: bool,
    /// When false, `step` leaves the target untouched.
    pub enabled: bool,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            use_name_prefix_discovery: true,
            joint_name_prefix: "mixamorig:".to_string(),
            driver_name_prefix: "Robot_".to_string(),
            include_fingers: false,
            use_root_translation: true,
            use_vertical_only_translation: true,
            reposition_whole_model: false,
            enabled: true,
        }
    }
}

#[cfg(feature = "json")]
impl RetargetConfig {
    /// Parse options from a JSON document. Missing fields keep their
    /// defaults.
    pub fn from_json_str(text: &str) -> Result<Self, crate::Error> {
        serde_json::from_str(text).map_err(|e| crate::Error::JsonParse {
            message: e.to_string(),
        })
    }
}
