//! Builds a small humanoid-ish rig with an arm and a leg IK chain, then runs the
//! pole angle operator over it.
//!
//! Usage: `pole_angle_rig [config.json] [active|selected|all]`
//!
//! Set `RUST_LOG=debug` to see per-bone results.

use std::error::Error;
use std::fs;

use bone_math::prelude::glam::{Mat4, Quat, Vec3};
use bone_math::prelude::*;

fn build_rig() -> Armature {
    let mut armature = Armature::new();

    let root = armature.add_bone("root", None, Mat4::IDENTITY, 1.0);

    // Left arm hangs off the top of the root, bent slightly forward at the elbow.
    let upper_arm = armature.add_bone(
        "upper_arm.L",
        Some(root),
        Mat4::from_translation(Vec3::Y) * Mat4::from_rotation_z(-1.2),
        0.6,
    );
    let forearm = armature.add_bone(
        "forearm.L",
        Some(upper_arm),
        Mat4::from_translation(Vec3::Y * 0.6) * Mat4::from_rotation_x(-0.35),
        0.55,
    );
    armature.bones[forearm].constraints.push(Constraint::Ik(
        IkConstraint::new()
            .with_target(Vec3::new(1.1, 1.2, 0.4))
            .with_pole_target(PoleTarget::Object {
                world_position: Vec3::new(0.8, 0.9, -1.0),
            })
            .with_chain_count(2),
    ));

    // Left leg points down with a knee bend; its pole is a bone of this armature.
    let thigh = armature.add_bone(
        "thigh.L",
        Some(root),
        Mat4::from_translation(Vec3::new(0.15, 0.0, 0.0)) * Mat4::from_rotation_x(std::f32::consts::PI),
        0.8,
    );
    let shin = armature.add_bone(
        "shin.L",
        Some(thigh),
        Mat4::from_translation(Vec3::Y * 0.8) * Mat4::from_rotation_x(0.25),
        0.8,
    );
    armature.add_bone("knee_pole.L", None, Mat4::from_translation(Vec3::new(0.15, -0.8, 1.0)), 0.2);
    armature.bones[shin].constraints.push(Constraint::Ik(
        IkConstraint::new()
            .with_target(Vec3::new(0.15, -1.5, 0.1))
            .with_pole_target(PoleTarget::Armature {
                subtarget: Some("knee_pole.L".into()),
            })
            .with_chain_count(2),
    ));

    // Posed away from rest; the operator measures the chains in rest pose.
    armature.bones[upper_arm].pose_basis = Mat4::from_quat(Quat::from_rotation_y(0.7));
    armature.bones[thigh].pose_basis = Mat4::from_quat(Quat::from_rotation_x(-0.4));

    armature.bones[forearm].selected = true;
    armature.bones[shin].selected = true;
    armature
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Starting pole angle rig example");

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => {
            log::info!("Loading config from {path}");
            serde_json::from_str::<CalculatePoleAngleConfig>(&fs::read_to_string(&path)?)?
        }
        None => CalculatePoleAngleConfig {
            selection: BoneSelection::Selected,
            ..CalculatePoleAngleConfig::default()
        },
    };
    if let Some(selection) = args.next() {
        config.selection = selection.parse()?;
    }
    let armature = build_rig();
    let active = armature.find_bone("forearm.L");
    let mut context = RigContext::pose_mode(armature, active);

    if !CalculatePoleAngle::poll(&context) {
        return Err("pole angle operator cannot run in this context".into());
    }

    let operator = CalculatePoleAngle::new(config);
    log::info!("Config: {}", serde_json::to_string(operator.config())?);

    let report = operator.execute(&mut context)?;
    log::info!("Status: {:?}", report.status);

    let armature = context.armature.as_ref().ok_or(RigError::NoArmature)?;
    let name = |id: BoneId| armature.bone(id).map_or("?", |bone| bone.name.as_str());
    for &(bone, angle) in &report.updated {
        log::info!(
            "{:<12} pole angle {:>9.4} rad ({:>8.3} deg)",
            name(bone),
            angle,
            angle.to_degrees()
        );
    }
    for (bone, reason) in &report.skipped {
        log::info!("{:<12} skipped: {:?}", name(*bone), reason);
    }

    Ok(())
}
