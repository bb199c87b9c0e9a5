use crate::{
    Binding, Error, JointResolver, PrefixNameResolver, Region, RetargetConfig, Skeleton,
};
use glam::{Quat, Vec3};

/// Drives a target skeleton's pose from a driver skeleton every frame.
///
/// Built by [`Retargeter::bind`] or [`Retargeter::bind_with`]; a failed bind
/// produces no engine value, so a partial binding can never be stepped. The
/// host calls [`Retargeter::step`] exactly once per simulation tick with
/// exclusive access to the target skeleton.
#[derive(Clone, Debug)]
pub struct Retargeter {
    config: RetargetConfig,
    driver_resolver: JointResolver,
    target_resolver: JointResolver,
    binding: Binding,

    body_rotation_reference: Quat,
    driver_root_bind_position: Vec3,
    baseline_position: Vec3,
}

impl Retargeter {
    /// Bind with prefixed-name discovery on both rigs, per the config.
    ///
    /// Fails with [`Error::ManualMappingRequired`] when the config disables
    /// name discovery; use [`Retargeter::bind_with`] in that case.
    pub fn bind(
        driver: &Skeleton,
        target: &Skeleton,
        config: &RetargetConfig,
    ) -> Result<Self, Error> {
        if !config.use_name_prefix_discovery {
            return Err(Error::ManualMappingRequired);
        }
        let driver_resolver = JointResolver::PrefixName(PrefixNameResolver::new(
            config.driver_name_prefix.clone(),
            false,
        ));
        let target_resolver = JointResolver::PrefixName(PrefixNameResolver::new(
            config.joint_name_prefix.clone(),
            config.include_fingers,
        ));
        Self::bind_with(driver, target, &driver_resolver, &target_resolver, config)
    }

    /// Bind with injected joint-resolution strategies.
    ///
    /// Both skeletons must be fully constructed and in their bind pose; the
    /// offsets and position baselines captured here stay fixed until
    /// [`Retargeter::rebind`].
    pub fn bind_with(
        driver: &Skeleton,
        target: &Skeleton,
        driver_resolver: &JointResolver,
        target_resolver: &JointResolver,
        config: &RetargetConfig,
    ) -> Result<Self, Error> {
        let binding = Binding::new(driver, target, driver_resolver, target_resolver)?;

        let body_rotation_reference = target.world_rotation(binding.target_model_root());
        let driver_root_bind_position = driver.local_position(binding.driver_hips());
        let baseline_position = if config.reposition_whole_model {
            target.local_position(binding.target_model_root())
        } else {
            target.local_position(binding.target_hips())
        };

        Ok(Self {
            config: config.clone(),
            driver_resolver: driver_resolver.clone(),
            target_resolver: target_resolver.clone(),
            binding,
            body_rotation_reference,
            driver_root_bind_position,
            baseline_position,
        })
    }

    /// Apply one retargeting frame: driver pose in, target pose out.
    ///
    /// The driver skeleton's world transforms must be current. A disabled
    /// engine leaves the target untouched. The target's world rotations and
    /// the translated root position are written directly; call
    /// [`Skeleton::update_world_transform`] on the target afterwards if world
    /// positions of unretargeted joints are needed.
    pub fn step(&mut self, driver: &Skeleton, target: &mut Skeleton) {
        if !self.config.enabled {
            return;
        }

        // Re-read every frame so host rotation of the target (a character
        // controller turning the model) re-frames every joint.
        self.body_rotation_reference = target.world_rotation(self.binding.target_model_root());

        self.apply_rotations(driver, target);
        self.apply_translation(driver, target);
    }

    fn apply_rotations(&self, driver: &Skeleton, target: &mut Skeleton) {
        for region in Region::ALL {
            let driver_chain = self.binding.driver_chains().get(region);
            let target_chain = self.binding.target_chains().get(region);
            let offsets = self.binding.offsets(region);

            // Chains pair by index; a length mismatch retargets only the
            // overlapping prefix.
            let len = driver_chain.len().min(target_chain.len());
            for i in 0..len {
                let rotation = self.body_rotation_reference
                    * driver.world_rotation(driver_chain[i])
                    * offsets[i];
                target.set_world_rotation(target_chain[i], rotation);
            }
        }
    }

    fn apply_translation(&self, driver: &Skeleton, target: &mut Skeleton) {
        let delta =
            driver.local_position(self.binding.driver_hips()) - self.driver_root_bind_position;

        if self.config.reposition_whole_model {
            let root = self.binding.target_model_root();
            if self.config.use_root_translation {
                // The model's facing folds into the translation so the
                // capture walks in the direction the model is turned.
                let position = target.local_rotation(root) * delta + self.baseline_position;
                target.set_local_position(root, position);
            } else if self.config.use_vertical_only_translation {
                let mut position = target.local_position(root);
                position.y = self.baseline_position.y + delta.y;
                target.set_local_position(root, position);
            }
        } else {
            let hips = self.binding.target_hips();
            if self.config.use_root_translation {
                target.set_local_position(hips, delta + self.baseline_position);
            } else if self.config.use_vertical_only_translation {
                let mut position = target.local_position(hips);
                position.y = self.baseline_position.y + delta.y;
                target.set_local_position(hips, position);
            }
        }
    }

    /// Re-anchor the translation baseline so re-enabling root translation
    /// does not snap the target back to wherever the raw driver offset would
    /// place it.
    ///
    /// With `use_current_position`, the current position is treated as
    /// continuous with the driver's current offset from its own bind
    /// position, so the next [`Retargeter::step`] reproduces the current
    /// position exactly. Otherwise the baseline is simply reset to the
    /// current position, discarding driver-relative continuity.
    pub fn rebaseline(
        &mut self,
        driver: &Skeleton,
        target: &Skeleton,
        use_current_position: bool,
    ) {
        let current = if self.config.reposition_whole_model {
            target.local_position(self.binding.target_model_root())
        } else {
            target.local_position(self.binding.target_hips())
        };

        self.baseline_position = if use_current_position {
            // TODO: fold the model's facing into this when repositioning the
            // whole model; a host-rotated model still drifts on re-anchor.
            current
                - (driver.local_position(self.binding.driver_hips())
                    - self.driver_root_bind_position)
        } else {
            current
        };

        log::debug!("rebaselined target to {:?}", self.baseline_position);
    }

    /// Recompute chains, offsets and baselines from scratch with the
    /// resolvers supplied at bind time. Atomic: on error the existing
    /// binding is left untouched.
    pub fn rebind(&mut self, driver: &Skeleton, target: &Skeleton) -> Result<(), Error> {
        let rebound = Self::bind_with(
            driver,
            target,
            &self.driver_resolver,
            &self.target_resolver,
            &self.config,
        )?;
        *self = rebound;
        Ok(())
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn set_use_root_translation(&mut self, on: bool) {
        self.config.use_root_translation = on;
    }

    pub fn set_use_vertical_only_translation(&mut self, on: bool) {
        self.config.use_vertical_only_translation = on;
    }

    pub fn config(&self) -> &RetargetConfig {
        &self.config
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// The translation baseline the policies offset from (hosts use this for
    /// debug markers).
    pub fn baseline_position(&self) -> Vec3 {
        self.baseline_position
    }

    /// The shared rotation reference captured by the last step.
    pub fn body_rotation_reference(&self) -> Quat {
        self.body_rotation_reference
    }
}
