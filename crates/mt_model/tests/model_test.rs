// crates/mt_model/tests/model_test.rs

//! 模型级行为测试
//!
//! 通过公开入口 (set_particle_data / seed / update) 验证完整契约：
//! 无效种子批次的拒绝、垂向边界检查、dt=0 幂等、往返可逆、
//! 离域状态迁移。数据源为理想化海盆
//! （单位正方形域，水深 1 m，水位 0 m）。

use glam::{DVec2, DVec3};
use mt_config::{NumMethodKind, RunConfig, SeedPolicy};
use mt_data::{DataReader, IdealizedReader};
use mt_foundation::MtError;
use mt_model::{OptModel, ParticleStatus};

fn test_config(kind: NumMethodKind) -> RunConfig {
    let mut config = RunConfig::default();
    config.numerics.num_method = kind;
    config
}

fn unit_basin_model(kind: NumMethodKind) -> OptModel {
    OptModel::new(&test_config(kind), Box::new(IdealizedReader::new())).unwrap()
}

// ============================================================
// 种子批次校验
// ============================================================

#[test]
fn test_all_seed_particles_lie_outside_of_the_model_domain() {
    let mut model = unit_basin_model(NumMethodKind::Test);
    model
        .set_particle_data(&[1, 1], &[-1.0, -1.0], &[-1.0, -1.0], &[-1.0, -1.0])
        .unwrap();

    let err = model.seed(0.0).unwrap_err();
    assert!(matches!(err, MtError::Domain { .. }));

    // 回滚语义：存储未被播种修改
    let snap = model.snapshot();
    assert!(snap.status.iter().all(|s| *s == ParticleStatus::Pending));
}

#[test]
fn test_seed_particle_is_above_the_free_surface() {
    let mut model = unit_basin_model(NumMethodKind::Test);
    model
        .set_particle_data(&[1], &[0.5], &[0.5], &[0.1])
        .unwrap();

    let err = model.seed(0.0).unwrap_err();
    assert!(matches!(err, MtError::BoundsViolation { .. }));
}

#[test]
fn test_seed_particle_is_below_the_sea_floor() {
    let mut model = unit_basin_model(NumMethodKind::Test);
    model
        .set_particle_data(&[1], &[0.5], &[0.5], &[-1.1])
        .unwrap();

    let err = model.seed(0.0).unwrap_err();
    assert!(matches!(err, MtError::BoundsViolation { .. }));
}

#[test]
fn test_valid_seed_batch_all_active() {
    let mut model = unit_basin_model(NumMethodKind::Test);
    model
        .set_particle_data(
            &[1, 1, 2],
            &[0.25, 0.5, 0.75],
            &[0.25, 0.5, 0.75],
            &[-0.1, -0.5, -0.9],
        )
        .unwrap();

    let report = model.seed(0.0).unwrap();
    assert_eq!(report.seeded, 3);
    assert_eq!(model.n_active(), 3);
    let snap = model.snapshot();
    assert!(snap.status.iter().all(|s| *s == ParticleStatus::Active));
    // 组号在播种后保持不变
    assert_eq!(snap.group_ids, vec![1, 1, 2]);
}

#[test]
fn test_flag_invalid_policy_seeds_valid_subset() {
    let mut config = test_config(NumMethodKind::Test);
    config.simulation.seed_policy = SeedPolicy::FlagInvalid;
    let mut model = OptModel::new(&config, Box::new(IdealizedReader::new())).unwrap();

    model
        .set_particle_data(&[1, 1], &[0.5, -9.0], &[0.5, 0.5], &[-0.5, -0.5])
        .unwrap();

    let report = model.seed(0.0).unwrap();
    assert_eq!(report.seeded, 1);
    assert_eq!(report.rejected, 1);

    let snap = model.snapshot();
    assert_eq!(snap.status[0], ParticleStatus::Active);
    assert_eq!(snap.status[1], ParticleStatus::OutsideDomain);
}

#[test]
fn test_set_particle_data_size_mismatch() {
    let mut model = unit_basin_model(NumMethodKind::Test);
    let err = model
        .set_particle_data(&[1, 1], &[0.5], &[0.5, 0.5], &[-0.5, -0.5])
        .unwrap_err();
    assert!(matches!(err, MtError::SizeMismatch { .. }));
}

#[test]
fn test_update_before_seed_rejected() {
    let mut model = unit_basin_model(NumMethodKind::Test);
    model
        .set_particle_data(&[1], &[0.5], &[0.5], &[-0.5])
        .unwrap();
    assert!(matches!(
        model.update(0.0, 60.0),
        Err(MtError::InvalidInput { .. })
    ));
}

// ============================================================
// 积分行为
// ============================================================

#[test]
fn test_update_with_zero_dt_is_identity() {
    let reader = IdealizedReader::new().with_drift(DVec3::new(0.05, 0.0, 0.0));
    let mut model = OptModel::new(&test_config(NumMethodKind::Rk4), Box::new(reader)).unwrap();
    model
        .set_particle_data(&[1, 1], &[0.3, 0.6], &[0.4, 0.7], &[-0.5, -0.2])
        .unwrap();
    model.seed(0.0).unwrap();

    let before = model.snapshot();
    let stats = model.update(0.0, 0.0).unwrap();
    let after = model.snapshot();

    assert_eq!(stats.advanced, 0);
    assert_eq!(before.x, after.x);
    assert_eq!(before.y, after.y);
    assert_eq!(before.z, after.z);
    assert_eq!(before.status, after.status);
}

#[test]
fn test_forward_backward_round_trip() {
    // 大海盆刚体旋转，单步旋转角保持小角度
    let reader = IdealizedReader::new()
        .with_extent(DVec2::new(-100.0, -100.0), DVec2::new(100.0, 100.0))
        .with_floor_depth(50.0)
        .with_rotation(0.01);
    let mut model = OptModel::new(&test_config(NumMethodKind::Rk4), Box::new(reader)).unwrap();
    model
        .set_particle_data(&[1], &[20.0], &[10.0], &[-5.0])
        .unwrap();
    model.seed(0.0).unwrap();

    let start = model.snapshot();
    model.update(0.0, 5.0).unwrap();
    model.update(5.0, -5.0).unwrap();
    let end = model.snapshot();

    assert!((end.x[0] - start.x[0]).abs() < 1e-6);
    assert!((end.y[0] - start.y[0]).abs() < 1e-6);
    assert!((end.z[0] - start.z[0]).abs() < 1e-9);
}

#[test]
fn test_particle_exiting_domain_is_flagged_and_frozen() {
    let reader = IdealizedReader::new().with_drift(DVec3::new(0.02, 0.0, 0.0));
    let mut model = OptModel::new(&test_config(NumMethodKind::Euler), Box::new(reader)).unwrap();
    model
        .set_particle_data(&[1, 1], &[0.2, 0.9], &[0.5, 0.5], &[-0.5, -0.5])
        .unwrap();
    model.seed(0.0).unwrap();

    // 粒子1: 0.9 + 0.2 = 1.1 → 离域；粒子0 仍在域内
    let stats = model.update(0.0, 10.0).unwrap();
    assert_eq!(stats.exited_domain, 1);
    assert_eq!(stats.active_after, 1);

    let snap = model.snapshot();
    assert_eq!(snap.status[1], ParticleStatus::OutsideDomain);
    let exit_x = snap.x[1];

    // 离域粒子位置在后续步中冻结，有效粒子继续推进
    let stats = model.update(10.0, 10.0).unwrap();
    assert_eq!(stats.advanced, 1);
    let snap = model.snapshot();
    assert_eq!(snap.x[1], exit_x);
    assert!(snap.x[0] > 0.2);
}

#[test]
fn test_adaptive_method_refinement_budget() {
    let reader = IdealizedReader::new()
        .with_extent(DVec2::new(-100.0, -100.0), DVec2::new(100.0, 100.0))
        .with_floor_depth(50.0)
        .with_rotation(0.05);
    let mut config = test_config(NumMethodKind::AdaptiveRk4);
    config.numerics.adaptive.tolerance = 1e-300;
    config.numerics.adaptive.max_refinements = 1;
    let mut model = OptModel::new(&config, Box::new(reader)).unwrap();
    model
        .set_particle_data(&[1], &[10.0], &[0.0], &[-5.0])
        .unwrap();
    model.seed(0.0).unwrap();

    let err = model.update(0.0, 3600.0).unwrap_err();
    match err {
        MtError::Convergence { particle, dt, .. } => {
            assert_eq!(particle, 0);
            assert!((dt - 3600.0).abs() < 1e-12);
        }
        other => panic!("期望 Convergence, 实际 {:?}", other),
    }
}

// ============================================================
// 时间索引
// ============================================================

#[test]
fn test_reader_time_index_is_exposed() {
    let model = unit_basin_model(NumMethodKind::Test);
    let datetimes = model.reader().datetimes().unwrap();
    assert_eq!(datetimes.len(), 25);
    assert_eq!(model.reader().datetime(0).unwrap(), datetimes[0]);
}
