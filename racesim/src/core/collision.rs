use crate::core::car::Vehicle;
use glam::DVec2;

/// Distance both cars are moved apart per separation step.
pub const NUDGE_STEP: f64 = 1.0;

/// intersects tests the footprints of two cars for overlap.
pub fn intersects(a: &Vehicle, b: &Vehicle) -> bool {
    a.footprint().intersects(&b.footprint())
}

/// nudge_apart moves both cars one step apart along the axis with the larger gap between their
/// centers. Cars sharing a center are pushed apart along x.
pub fn nudge_apart(a: &mut Vehicle, b: &mut Vehicle) {
    let gap = b.position - a.position;

    let dir = if gap.x.abs() >= gap.y.abs() {
        DVec2::new(if gap.x < 0.0 { -1.0 } else { 1.0 }, 0.0)
    } else {
        DVec2::new(0.0, if gap.y < 0.0 { -1.0 } else { 1.0 })
    };

    a.position -= dir * NUDGE_STEP;
    b.position += dir * NUDGE_STEP;
}

/// separate nudges two overlapping cars apart until their footprints no longer intersect, or
/// `max_steps` is reached. Returns the number of steps taken.
pub fn separate(a: &mut Vehicle, b: &mut Vehicle, max_steps: u32) -> u32 {
    let mut steps = 0;
    while steps < max_steps && intersects(a, b) {
        nudge_apart(a, b);
        steps += 1;
    }
    steps
}

/// resolve_collisions checks every unordered pair of cars once and separates the overlapping
/// ones. Returns the number of pairs that had to be separated.
pub fn resolve_collisions(cars: &mut [Vehicle], max_steps: u32) -> usize {
    let mut no_collisions = 0;

    for i in 0..cars.len() {
        for j in i + 1..cars.len() {
            let (head, tail) = cars.split_at_mut(j);
            if separate(&mut head[i], &mut tail[0], max_steps) > 0 {
                no_collisions += 1;
            }
        }
    }

    no_collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::car::{ControllerKind, VehicleConfig};
    use crate::core::parts::{PartCatalog, PartCatalogPars};

    fn car(x: f64, y: f64, rotation: f64) -> Vehicle {
        let pars: PartCatalogPars = serde_json::from_str(
            r#"{
                "body": [{"id": "fellali", "name": "F", "price": 0, "mass": 4.0, "width": 100.0,
                          "height": 180.0}],
                "engine": [{"id": "basic", "name": "B", "price": 0, "power": 0.8}],
                "tyres": [{"id": "second_hand", "name": "S", "price": 0, "grip": 1.0}]
            }"#,
        )
        .unwrap();
        let mut car = Vehicle::from_config(
            "c",
            &VehicleConfig::default(),
            &PartCatalog::new(pars),
            ControllerKind::Computer,
        )
        .unwrap();
        car.reset(DVec2::new(x, y), rotation, 0.3);
        car
    }

    #[test]
    fn nudges_along_larger_gap() {
        let mut a = car(0.0, 0.0, 0.0);
        let mut b = car(-10.0, 3.0, 0.0);
        nudge_apart(&mut a, &mut b);
        assert_eq!(a.position, DVec2::new(1.0, 0.0));
        assert_eq!(b.position, DVec2::new(-11.0, 3.0));

        let mut a = car(0.0, 0.0, 0.0);
        let mut b = car(2.0, 5.0, 0.0);
        nudge_apart(&mut a, &mut b);
        assert_eq!(a.position, DVec2::new(0.0, -1.0));
        assert_eq!(b.position, DVec2::new(2.0, 6.0));
    }

    #[test]
    fn overlapping_cars_are_separated() {
        // 30 x 54 footprints
        let mut a = car(100.0, 100.0, 0.0);
        let mut b = car(110.0, 120.0, 30.0);
        assert!(intersects(&a, &b));

        let steps = separate(&mut a, &mut b, 1000);
        assert!(steps > 0 && steps < 1000);
        assert!(!intersects(&a, &b));
        // the gap along y was larger, x stays untouched
        assert_eq!(a.position.x, 100.0);
        assert_eq!(b.position.x, 110.0);
    }

    #[test]
    fn identical_positions_terminate() {
        let mut a = car(50.0, 50.0, 45.0);
        let mut b = car(50.0, 50.0, 45.0);
        let steps = separate(&mut a, &mut b, 1000);
        assert!(steps < 1000);
        assert!(!intersects(&a, &b));
    }

    #[test]
    fn step_limit_is_respected() {
        let mut a = car(0.0, 0.0, 0.0);
        let mut b = car(0.0, 1.0, 0.0);
        assert_eq!(separate(&mut a, &mut b, 3), 3);
        assert!(intersects(&a, &b));
    }

    #[test]
    fn every_pair_is_checked() {
        let mut cars = vec![
            car(0.0, 0.0, 0.0),
            car(500.0, 500.0, 0.0),
            car(5.0, 0.0, 0.0),
            car(505.0, 500.0, 90.0),
        ];
        assert_eq!(resolve_collisions(&mut cars, 1000), 2);
        for i in 0..cars.len() {
            for j in i + 1..cars.len() {
                assert!(!intersects(&cars[i], &cars[j]));
            }
        }
        assert_eq!(resolve_collisions(&mut cars, 1000), 0);
    }
}
