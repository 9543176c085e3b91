use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where an IK constraint's pole target lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PoleTarget {
    /// A plain object; its world position is the pole.
    Object { world_position: Vec3 },
    /// The armature itself; the named sub-target bone's head is the pole.
    Armature { subtarget: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IkConstraint {
    pub target: Option<Vec3>,
    pub pole_target: Option<PoleTarget>,
    /// Radians.
    pub pole_angle: f32,
    /// Number of bones in the chain, counted from the owner up. 0 runs to the root.
    pub chain_count: u32,
}

impl IkConstraint {
    pub fn new() -> Self {
        Self {
            target: None,
            pole_target: None,
            pole_angle: 0.0,
            chain_count: 0,
        }
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_pole_target(mut self, pole_target: PoleTarget) -> Self {
        self.pole_target = Some(pole_target);
        self
    }

    pub fn with_chain_count(mut self, chain_count: u32) -> Self {
        self.chain_count = chain_count;
        self
    }
}

impl Default for IkConstraint {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    Ik(IkConstraint),
    Other { name: String },
}

impl Constraint {
    pub fn as_ik(&self) -> Option<&IkConstraint> {
        match self {
            Constraint::Ik(ik) => Some(ik),
            Constraint::Other { .. } => None,
        }
    }

    pub fn as_ik_mut(&mut self) -> Option<&mut IkConstraint> {
        match self {
            Constraint::Ik(ik) => Some(ik),
            Constraint::Other { .. } => None,
        }
    }
}
