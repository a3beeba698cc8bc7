use crate::core::car::{heading, wrap_degrees, Vehicle};
use crate::core::input::ControlInput;
use crate::core::race::SimConstants;
use crate::core::track::Track;
use glam::DVec2;

/// sensor_position returns the probe point in front of the car for the given absolute rotation.
pub fn sensor_position(vehicle: &Vehicle, rotation: f64, consts: &SimConstants) -> DVec2 {
    let offset = vehicle.body_height() / 2.0 + consts.sensor_margin;
    vehicle.position + heading(rotation) * offset
}

/// sensor_values samples the path channel at the left, center and right probes.
pub fn sensor_values(vehicle: &Vehicle, track: &Track, consts: &SimConstants) -> [u8; 3] {
    let left = sensor_position(
        vehicle,
        wrap_degrees(vehicle.rotation - consts.sensor_angle),
        consts,
    );
    let center = sensor_position(vehicle, vehicle.rotation, consts);
    let right = sensor_position(
        vehicle,
        wrap_degrees(vehicle.rotation + consts.sensor_angle),
        consts,
    );

    [
        track.path_value_at(left),
        track.path_value_at(center),
        track.path_value_at(right),
    ]
}

/// steer turns towards the probe with the strictly highest path value and always accelerates.
/// It is memoryless: equal probe values mean driving straight on, even into a wall.
pub fn steer(vehicle: &Vehicle, track: &Track, consts: &SimConstants) -> ControlInput {
    let [left, center, right] = sensor_values(vehicle, track, consts);

    let rot_dir = if left > right && left > center {
        -1
    } else if right > left && right > center {
        1
    } else {
        0
    };

    ControlInput::new(1, rot_dir)
}
