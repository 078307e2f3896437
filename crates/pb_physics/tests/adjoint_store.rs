// crates/pb_physics/tests/adjoint_store.rs

//! 伴随点存储测试

use pb_config::{AdjointConfig, NumericsConfig};
use pb_foundation::PbError;
use pb_physics::{AdjointField, AdjointNodeStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn store(n_points: usize, n_dim: usize) -> AdjointNodeStore {
    AdjointNodeStore::new(&vec![0.0; n_dim], n_points, n_dim, n_dim, 2).unwrap()
}

/// 默认全部为零（伴随解取零初值）
#[test]
fn test_all_fields_default_to_zero() {
    let s = store(5, 3);
    for field in AdjointField::ALL {
        assert!(s.field(field).as_slice().iter().all(|&v| v == 0.0), "{:?}", field);
    }
}

/// 任意 (点, 分量) 写后读一致，且不影响其他槽位
#[test]
fn test_generic_round_trip_every_field() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut s = store(16, 3);
    for field in AdjointField::ALL {
        let width = s.field(field).width();
        for _ in 0..20 {
            let point = rng.gen_range(0..16);
            let comp = rng.gen_range(0..width);
            let value: f64 = rng.gen_range(-10.0..10.0);
            let before: f64 = s.field(field).as_slice().iter().map(|v| v.abs()).sum();
            let old = s.get(field, point, comp);
            s.set(field, point, comp, value);
            assert_eq!(s.get(field, point, comp), value);
            assert_eq!(s.try_get(field, point, comp), Ok(value));
            let after: f64 = s.field(field).as_slice().iter().map(|v| v.abs()).sum();
            assert!((after - (before - old.abs() + value.abs())).abs() < 1e-9);
        }
    }
}

#[test]
fn test_named_accessors_map_to_fields() {
    let mut s = store(3, 2);
    s.set_solution(0, 1, 1.0);
    s.set_sensitivity(1, 0, 2.0);
    s.set_sensitivity_shifted_lagrangian(2, 1, 3.0);
    s.set_sensitivity_augmented_lagrangian(2, 1, 1, 4.0);
    s.set_solution_direct(1, 1, 5.0);
    s.set_dual_time_derivative(0, 0, 6.0);
    s.set_dual_time_derivative_n(0, 1, 7.0);
    s.set_cross_term_derivative(2, 0, 8.0);
    s.set_geometry_cross_term_derivative(1, 1, 9.0);
    s.set_geometry_cross_term_derivative_flow(0, 0, 10.0);
    s.set_solution_geometry(2, 1, 11.0);
    s.set_solution_geometry_old(1, 0, 12.0);
    s.set_geometry_direct(0, 1, 13.0);
    s.set_solution_bgs(2, 0, 14.0);
    s.set_solution_geometry_bgs_k(1, 1, 15.0);

    assert_eq!(s.get(AdjointField::Solution, 0, 1), 1.0);
    assert_eq!(s.get(AdjointField::Sensitivity, 1, 0), 2.0);
    assert_eq!(s.get(AdjointField::SensitivityShiftedLagrangian, 2, 1), 3.0);
    assert_eq!(s.get(AdjointField::SensitivityAugmentedLagrangian, 2, 3), 4.0);
    assert_eq!(s.get(AdjointField::SolutionDirect, 1, 1), 5.0);
    assert_eq!(s.get(AdjointField::DualTimeDerivative, 0, 0), 6.0);
    assert_eq!(s.get(AdjointField::DualTimeDerivativeN, 0, 1), 7.0);
    assert_eq!(s.get(AdjointField::CrossTermDerivative, 2, 0), 8.0);
    assert_eq!(s.get(AdjointField::GeometryCrossTermDerivative, 1, 1), 9.0);
    assert_eq!(s.get(AdjointField::GeometryCrossTermDerivativeFlow, 0, 0), 10.0);
    assert_eq!(s.get(AdjointField::SolutionGeometry, 2, 1), 11.0);
    assert_eq!(s.get(AdjointField::SolutionGeometryOld, 1, 0), 12.0);
    assert_eq!(s.get(AdjointField::GeometryDirect, 0, 1), 13.0);
    assert_eq!(s.get(AdjointField::SolutionBgs, 2, 0), 14.0);
    assert_eq!(s.get(AdjointField::SolutionGeometryBgsK, 1, 1), 15.0);
}

#[test]
fn test_row_accessors() {
    let mut s = store(4, 3);
    s.set_solution_direct_row(2, &[1.0, 2.0, 3.0]);
    s.set_geometry_direct_row(3, &[-1.0, 0.0, 1.0]);
    s.set_solution_geometry_row(0, &[0.5, 0.5, 0.5]);
    assert_eq!(s.solution_direct_row(2), &[1.0, 2.0, 3.0]);
    assert_eq!(s.geometry_direct(3, 0), -1.0);
    assert_eq!(s.solution_geometry_row(0), &[0.5; 3]);
    assert_eq!(s.solution_direct_row(1), &[0.0; 3]);
}

#[test]
fn test_try_get_out_of_bounds() {
    let s = store(4, 2);
    assert!(matches!(
        s.try_get(AdjointField::Sensitivity, 4, 0),
        Err(PbError::IndexOutOfBounds { index: 4, len: 4, .. })
    ));
    assert!(matches!(
        s.try_get(AdjointField::Sensitivity, 0, 2),
        Err(PbError::IndexOutOfBounds { index: 2, len: 2, .. })
    ));
}

#[test]
#[should_panic]
fn test_point_out_of_bounds_panics() {
    let s = store(4, 2);
    let _ = s.sensitivity(4, 0);
}

#[test]
#[should_panic]
fn test_component_out_of_bounds_panics() {
    let mut s = store(4, 2);
    s.set_solution_geometry(0, 2, 1.0);
}

#[test]
fn test_sweep_accumulation_cycle() {
    let mut s = store(2, 2);
    for sweep in 1..=3 {
        s.begin_sweep();
        for _ in 0..4 {
            s.add_sensitivity(1, 0, 0.25);
            s.add_sensitivity_augmented_lagrangian(0, 1, 0, 0.5);
        }
        assert_eq!(s.sensitivity(1, 0), 1.0);
        assert_eq!(s.sensitivity_augmented_lagrangian(0, 1, 0), 2.0);
        assert_eq!(s.sweep_count(), sweep);
    }
}

#[test]
fn test_snapshot_old_geometry_only_copies() {
    let mut s = store(3, 2);
    s.set_solution_geometry_row(0, &[1.0, 2.0]);
    s.set_solution_geometry_row(2, &[-3.0, 4.0]);
    s.set_sensitivity(1, 1, 7.0);
    let before = s.clone();

    s.snapshot_old_geometry();
    assert_eq!(s.solution_geometry_old_row(0), &[1.0, 2.0]);
    assert_eq!(s.solution_geometry_old_row(2), &[-3.0, 4.0]);
    for field in AdjointField::ALL {
        if field != AdjointField::SolutionGeometryOld {
            assert_eq!(s.field(field), before.field(field), "{:?}", field);
        }
    }
}

#[test]
fn test_bgs_convergence_delta() {
    let mut s = store(3, 2);
    s.set_solution_geometry_row(1, &[1.0, 1.0]);
    s.snapshot_geometry_bgs();
    assert_eq!(s.max_geometry_bgs_delta(), 0.0);

    s.set_solution_geometry(1, 0, 1.5);
    s.set_solution_geometry(2, 1, -2.0);
    assert_eq!(s.geometry_bgs_delta(1, 0), 0.5);
    assert_eq!(s.geometry_bgs_delta(2, 1), -2.0);
    assert_eq!(s.max_geometry_bgs_delta(), 2.0);
}

#[test]
fn test_from_config() {
    let numerics = NumericsConfig::new(3, pb_config::ConvectiveScheme::Upwind);
    let adjoint = AdjointConfig::default();
    let s = AdjointNodeStore::from_config(&[1.0, 0.0, -1.0], 10, &numerics, &adjoint).unwrap();
    assert_eq!(s.n_var(), 3);
    assert_eq!(s.augmented_lagrangian_kinds(), 2);
    assert_eq!(s.field(AdjointField::SensitivityAugmentedLagrangian).width(), 6);
    assert_eq!(s.solution_row(9), &[1.0, 0.0, -1.0]);

    let bad = AdjointConfig {
        augmented_lagrangian_kinds: 0,
    };
    assert!(AdjointNodeStore::from_config(&[0.0; 3], 10, &numerics, &bad).is_err());
}
