//! Batch "Calculate Pole Angle" operator.
//!
//! For every chosen bone that owns an IK constraint with a pole target, the
//! operator walks up to the chain's first bone, snapshots the chain in its rest
//! pose and writes the resulting pole angle back into the constraint.

use std::str::FromStr;

use bone_math_core::{BoneMathError, PoleAngleConfig, PoleAngleSolver};
use glam::Vec3;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::armature::{Armature, Bone, BoneHierarchy, BoneId, PosePosition, PosePositionGuard};
use crate::chain::find_chain_start;
use crate::constraint::PoleTarget;
use crate::error::{Result, RigError};

/// Which bones the operator processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoneSelection {
    /// Only the active bone.
    #[default]
    Active,
    /// Every selected bone.
    Selected,
    /// Every bone in the armature.
    All,
}

impl BoneSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoneSelection::Active => "active",
            BoneSelection::Selected => "selected",
            BoneSelection::All => "all",
        }
    }
}

impl FromStr for BoneSelection {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(BoneSelection::Active),
            "selected" => Ok(BoneSelection::Selected),
            "all" => Ok(BoneSelection::All),
            other => Err(RigError::UnknownSelection(other.to_string())),
        }
    }
}

/// What to do with a bone whose chain geometry has no defined pole angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Leave the constraint untouched and report the bone as skipped.
    #[default]
    Skip,
    /// Write a pole angle of zero and log a warning.
    FallbackToZero,
    /// Stop the batch and return the error.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatePoleAngleConfig {
    pub selection: BoneSelection,
    pub degenerate_policy: DegeneratePolicy,
    pub solver: PoleAngleConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Object,
    Edit,
    Pose,
}

/// State the operator runs against.
#[derive(Debug, Clone, Default)]
pub struct RigContext {
    pub mode: InteractionMode,
    pub armature: Option<Armature>,
    pub active_bone: Option<BoneId>,
}

impl RigContext {
    pub fn pose_mode(armature: Armature, active_bone: Option<BoneId>) -> Self {
        Self {
            mode: InteractionMode::Pose,
            armature: Some(armature),
            active_bone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorStatus {
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoIkConstraint,
    NoPoleTarget,
    /// The pole target is the armature but no sub-target bone is set.
    MissingSubtarget,
    UnknownSubtarget(String),
    Degenerate(BoneMathError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationReport {
    pub status: OperatorStatus,
    /// Bones whose constraint received a new pole angle, with that angle.
    pub updated: Vec<(BoneId, f32)>,
    pub skipped: Vec<(BoneId, SkipReason)>,
}

impl CalculationReport {
    fn new(status: OperatorStatus) -> Self {
        Self {
            status,
            updated: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

pub struct CalculatePoleAngle {
    config: CalculatePoleAngleConfig,
    solver: PoleAngleSolver,
}

impl CalculatePoleAngle {
    pub const LABEL: &'static str = "Calculate Pole Angle";
    pub const DESCRIPTION: &'static str =
        "Calculate and set the correct pole angle for pose bones that have Inverse Kinematics constraints";

    pub fn new(config: CalculatePoleAngleConfig) -> Self {
        Self {
            config,
            solver: PoleAngleSolver::new(config.solver),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(CalculatePoleAngleConfig::default())
    }

    pub fn config(&self) -> &CalculatePoleAngleConfig {
        &self.config
    }

    /// Whether the operator can run in `context`.
    pub fn poll(context: &RigContext) -> bool {
        context.mode == InteractionMode::Pose && context.armature.is_some()
    }

    /// Run as a user invocation. Holding alt widens the selection to all selected bones.
    pub fn invoke(&self, context: &mut RigContext, alt: bool) -> Result<CalculationReport> {
        let selection = if alt {
            BoneSelection::Selected
        } else {
            self.config.selection
        };
        self.run(context, selection)
    }

    pub fn execute(&self, context: &mut RigContext) -> Result<CalculationReport> {
        self.run(context, self.config.selection)
    }

    fn run(&self, context: &mut RigContext, selection: BoneSelection) -> Result<CalculationReport> {
        if context.mode != InteractionMode::Pose {
            return Err(RigError::NotInPoseMode);
        }
        let active_bone = context.active_bone;
        let armature = context.armature.as_mut().ok_or(RigError::NoArmature)?;

        let bones = collect_bones(armature, selection, active_bone);
        if bones.is_empty() {
            info!("no bones to calculate for selection `{}`", selection.as_str());
            return Ok(CalculationReport::new(OperatorStatus::Cancelled));
        }

        let mut report = CalculationReport::new(OperatorStatus::Finished);
        for bone in bones {
            let Some(name) = armature.bone(bone).map(|b| b.name.clone()) else {
                continue;
            };
            let angle = match self.calculate_bone(armature, bone) {
                Ok(angle) => angle,
                Err(SkipReason::Degenerate(err)) => match self.config.degenerate_policy {
                    DegeneratePolicy::Skip => {
                        debug!("skipping `{name}`: {err}");
                        report.skipped.push((bone, SkipReason::Degenerate(err)));
                        continue;
                    }
                    DegeneratePolicy::FallbackToZero => {
                        warn!("`{name}`: {err}; setting pole angle to 0");
                        0.0
                    }
                    DegeneratePolicy::Abort => {
                        return Err(RigError::Degenerate {
                            bone: name,
                            source: err,
                        });
                    }
                },
                Err(reason) => {
                    debug!("skipping `{name}`: {reason:?}");
                    report.skipped.push((bone, reason));
                    continue;
                }
            };

            if let Some(ik) = armature.bone_mut(bone).and_then(Bone::ik_constraint_mut) {
                ik.pole_angle = angle;
            }
            debug!("`{name}` pole angle set to {angle:.6} rad");
            report.updated.push((bone, angle));
        }

        info!(
            "{}: updated {} bone(s), skipped {}",
            Self::LABEL,
            report.updated.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn calculate_bone(&self, armature: &mut Armature, bone: BoneId) -> std::result::Result<f32, SkipReason> {
        let ik = armature
            .bone(bone)
            .and_then(Bone::ik_constraint)
            .ok_or(SkipReason::NoIkConstraint)?;
        let pole_target = ik.pole_target.as_ref().ok_or(SkipReason::NoPoleTarget)?;
        let chain_count = ik.chain_count;

        // The pole is read in whatever pose the user has the armature in.
        let pole_position = resolve_pole_position(armature, pole_target)?;
        let start = find_chain_start(&*armature, bone, chain_count);

        let rest = PosePositionGuard::new(armature, PosePosition::Rest);
        let start_frame = rest.frame(start);
        let end_position = rest.tail(bone);
        drop(rest);

        self.solver
            .solve(&start_frame, end_position, pole_position)
            .map_err(SkipReason::Degenerate)
    }
}

fn collect_bones(armature: &Armature, selection: BoneSelection, active_bone: Option<BoneId>) -> Vec<BoneId> {
    match selection {
        BoneSelection::Active => active_bone
            .filter(|&id| id < armature.bones.len())
            .into_iter()
            .collect(),
        BoneSelection::Selected => armature
            .bones
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.selected)
            .map(|(id, _)| id)
            .collect(),
        BoneSelection::All => (0..armature.bones.len()).collect(),
    }
}

fn resolve_pole_position(armature: &Armature, pole_target: &PoleTarget) -> std::result::Result<Vec3, SkipReason> {
    match pole_target {
        PoleTarget::Object { world_position } => Ok(*world_position),
        PoleTarget::Armature { subtarget } => {
            let name = subtarget.as_deref().ok_or(SkipReason::MissingSubtarget)?;
            let id = armature
                .find_bone(name)
                .ok_or_else(|| SkipReason::UnknownSubtarget(name.to_string()))?;
            Ok(armature.head(id))
        }
    }
}
