use rand::rngs::StdRng;
use rand::SeedableRng;
use signaltune::engines::seeding::WebsterSeeder;
use signaltune::{IntersectionParams, SignalTuneError, Stage};

fn reference_intersection() -> IntersectionParams {
    IntersectionParams {
        saturation_flows: vec![1800.0; 4],
        lambda_rates: vec![6.0; 4],
        reaction_time: 1.0,
        road_widths: vec![3.2; 4],
        vehicle_speed: 13.89,
        deceleration_rate: 4.5,
        vehicle_length: 5.0,
    }
}

#[test]
fn test_reference_intersection_seeds_four_phases() {
    let params = reference_intersection();
    let seeder = WebsterSeeder::new(&params);

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let draw = seeder.seed_draw(&mut rng).unwrap();

        assert!(draw.critical_ratio < 1.0);
        assert_eq!(draw.plan.len(), 4);
        assert!(draw.plan.iter().all(|p| p.green >= 5.0));

        // C = ceil(1.5 L + 5) / (1 - Y) with L = 16
        let expected_cycle = 29.0 / (1.0 - draw.critical_ratio);
        assert!((draw.cycle_length - expected_cycle).abs() < 1e-9);

        let expected_y: f64 = draw.arrivals.iter().map(|q| q * 60.0 / 1800.0).sum();
        assert!((draw.critical_ratio - expected_y).abs() < 1e-12);
        assert!(draw.arrivals.iter().all(|&q| q >= 1.0 && q.fract() == 0.0));
    }
}

#[test]
fn test_greens_follow_flow_ratios() {
    let params = reference_intersection();
    let seeder = WebsterSeeder::new(&params);
    let mut rng = StdRng::seed_from_u64(99);
    let draw = seeder.seed_draw(&mut rng).unwrap();

    for (phase, &y) in draw.plan.iter().zip(&draw.flow_ratios) {
        let raw = (y * (draw.cycle_length - draw.lost_time) / draw.critical_ratio).ceil();
        assert_eq!(phase.green, raw.max(5.0));
    }
}

#[test]
fn test_infeasible_demand_reports_seeding_stage() {
    let params = IntersectionParams {
        lambda_rates: vec![40.0; 4],
        ..reference_intersection()
    };
    let seeder = WebsterSeeder::new(&params).with_max_attempts(10);
    let mut rng = StdRng::seed_from_u64(0);

    let err = seeder.seed(&mut rng).unwrap_err();
    assert!(matches!(err, SignalTuneError::InfeasibleDemand { attempts: 10, .. }));
    assert_eq!(err.stage(), Stage::Seeding);
    assert!(err.to_string().contains("Infeasible demand"));
}
