use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use bone_math_core::BoneFrame;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, IkConstraint};

pub type BoneId = usize;

/// Which set of matrices an armature currently exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PosePosition {
    #[default]
    Pose,
    Rest,
}

/// Read access to a bone hierarchy, as needed to walk an IK chain and capture its geometry.
///
/// Ids passed in come from the hierarchy itself; implementations may panic on unknown ids.
pub trait BoneHierarchy {
    fn parent(&self, bone: BoneId) -> Option<BoneId>;
    fn frame(&self, bone: BoneId) -> BoneFrame;
    fn tail(&self, bone: BoneId) -> Vec3;
}

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub parent: Option<BoneId>,
    /// Rest transform relative to the parent bone (or the armature for root bones).
    pub local_rest: Mat4,
    /// Pose transform applied on top of `local_rest`.
    pub pose_basis: Mat4,
    pub length: f32,
    pub selected: bool,
    pub constraints: Vec<Constraint>,
}

impl Bone {
    /// First IK constraint on the bone. Later ones are ignored.
    pub fn ik_constraint(&self) -> Option<&IkConstraint> {
        self.constraints.iter().find_map(Constraint::as_ik)
    }

    pub fn ik_constraint_mut(&mut self) -> Option<&mut IkConstraint> {
        self.constraints.iter_mut().find_map(Constraint::as_ik_mut)
    }
}

#[derive(Debug, Clone)]
pub struct Armature {
    pub bones: Vec<Bone>,
    pub bone_names: HashMap<String, BoneId>,
    pub pose_position: PosePosition,
}

impl Armature {
    pub fn new() -> Self {
        Self {
            bones: Vec::new(),
            bone_names: HashMap::new(),
            pose_position: PosePosition::Pose,
        }
    }

    /// Add a bone and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not the id of a bone already in the armature.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneId>,
        local_rest: Mat4,
        length: f32,
    ) -> BoneId {
        let name = name.into();
        let index = self.bones.len();
        if let Some(p) = parent {
            assert!(p < index, "parent {p} of bone `{name}` must be added before it");
        }

        self.bone_names.insert(name.clone(), index);
        self.bones.push(Bone {
            name,
            parent,
            local_rest,
            pose_basis: Mat4::IDENTITY,
            length,
            selected: false,
            constraints: Vec::new(),
        });
        index
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id)
    }

    pub fn bone_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.bones.get_mut(id)
    }

    pub fn find_bone(&self, name: &str) -> Option<BoneId> {
        self.bone_names.get(name).copied()
    }

    /// Armature-space matrix of one bone under the current pose position.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range. Use [`Armature::bone`] to check an id first.
    pub fn bone_matrix(&self, id: BoneId) -> Mat4 {
        let bone = &self.bones[id];
        let parent_matrix = bone
            .parent
            .map(|p| self.bone_matrix(p))
            .unwrap_or(Mat4::IDENTITY);

        match self.pose_position {
            PosePosition::Rest => parent_matrix * bone.local_rest,
            PosePosition::Pose => parent_matrix * bone.local_rest * bone.pose_basis,
        }
    }

    /// Head position of a bone under the current pose position. Panics like [`Armature::bone_matrix`].
    pub fn head(&self, id: BoneId) -> Vec3 {
        self.bone_matrix(id).w_axis.truncate()
    }
}

impl Default for Armature {
    fn default() -> Self {
        Self::new()
    }
}

impl BoneHierarchy for Armature {
    fn parent(&self, bone: BoneId) -> Option<BoneId> {
        self.bones[bone].parent
    }

    fn frame(&self, bone: BoneId) -> BoneFrame {
        BoneFrame::from_matrix(self.bone_matrix(bone))
    }

    fn tail(&self, bone: BoneId) -> Vec3 {
        self.frame(bone).tail(self.bones[bone].length)
    }
}

/// Holds an armature in a given pose position and restores the previous one on drop.
pub struct PosePositionGuard<'a> {
    armature: &'a mut Armature,
    previous: PosePosition,
}

impl<'a> PosePositionGuard<'a> {
    pub fn new(armature: &'a mut Armature, position: PosePosition) -> Self {
        let previous = armature.pose_position;
        armature.pose_position = position;
        Self { armature, previous }
    }

    pub fn previous(&self) -> PosePosition {
        self.previous
    }
}

impl Deref for PosePositionGuard<'_> {
    type Target = Armature;

    fn deref(&self) -> &Armature {
        &*self.armature
    }
}

impl DerefMut for PosePositionGuard<'_> {
    fn deref_mut(&mut self) -> &mut Armature {
        &mut *self.armature
    }
}

impl Drop for PosePositionGuard<'_> {
    fn drop(&mut self) {
        self.armature.pose_position = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::PoleTarget;
    use glam::Quat;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a} != {b}");
    }

    fn two_bone_arm() -> Armature {
        let mut armature = Armature::new();
        let upper = armature.add_bone("upper_arm", None, Mat4::IDENTITY, 1.0);
        armature.add_bone(
            "forearm",
            Some(upper),
            Mat4::from_translation(Vec3::Y) * Mat4::from_rotation_x(0.3),
            1.0,
        );
        armature
    }

    #[test]
    fn child_rest_matrix_composes_with_parent() {
        let armature = two_bone_arm();
        let forearm = armature.find_bone("forearm").unwrap();

        assert_vec_eq(armature.head(forearm), Vec3::Y);
        assert_vec_eq(armature.tail(forearm), Vec3::new(0.0, 1.0 + 0.3f32.cos(), 0.3f32.sin()));
        assert_eq!(armature.parent(forearm), Some(0));
        assert_eq!(armature.parent(0), None);
    }

    #[test]
    fn pose_basis_only_applies_in_pose_position() {
        let mut armature = two_bone_arm();
        armature.bones[0].pose_basis = Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));

        let posed = armature.tail(0);
        assert_vec_eq(posed, Vec3::new(-1.0, 0.0, 0.0));

        armature.pose_position = PosePosition::Rest;
        assert_vec_eq(armature.tail(0), Vec3::Y);
    }

    #[test]
    #[should_panic(expected = "must be added before it")]
    fn forward_parent_is_rejected() {
        let mut armature = Armature::new();
        armature.add_bone("orphan", Some(3), Mat4::IDENTITY, 1.0);
    }

    #[test]
    #[should_panic(expected = "must be added before it")]
    fn self_parent_is_rejected() {
        let mut armature = two_bone_arm();
        armature.add_bone("loop", Some(2), Mat4::IDENTITY, 1.0);
    }

    #[test]
    fn bone_lookup_is_checked() {
        let mut armature = two_bone_arm();
        assert_eq!(armature.bone(1).map(|b| b.name.as_str()), Some("forearm"));
        assert!(armature.bone(2).is_none());
        assert!(armature.bone_mut(7).is_none());
    }

    #[test]
    fn guard_restores_previous_position() {
        let mut armature = two_bone_arm();
        {
            let rest = PosePositionGuard::new(&mut armature, PosePosition::Rest);
            assert_eq!(rest.pose_position, PosePosition::Rest);
            assert_eq!(rest.previous(), PosePosition::Pose);
        }
        assert_eq!(armature.pose_position, PosePosition::Pose);
    }

    #[test]
    fn first_ik_constraint_wins() {
        let mut armature = two_bone_arm();
        let forearm = &mut armature.bones[1];
        forearm.constraints.push(Constraint::Other {
            name: "Limit Rotation".into(),
        });
        forearm
            .constraints
            .push(Constraint::Ik(IkConstraint::new().with_chain_count(2)));
        forearm.constraints.push(Constraint::Ik(
            IkConstraint::new().with_pole_target(PoleTarget::Armature { subtarget: None }),
        ));

        let ik = armature.bones[1].ik_constraint().unwrap();
        assert_eq!(ik.chain_count, 2);
        assert!(ik.pole_target.is_none());
        assert!(armature.bones[0].ik_constraint().is_none());
    }
}
