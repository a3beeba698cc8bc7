use crate::core::input::ControlInput;
use crate::core::parts::{Coefficients, PartCatalog, PartKind, PartRecord, TyreOffsets};
use crate::core::race::SimConstants;
use crate::core::track::Track;
use crate::error::SetupError;
use glam::DVec2;
use helpers::general::signum;
use helpers::geometry::Polygon;
use serde::{Deserialize, Serialize};

/// VehicleConfig holds the equipped part identifiers only. It is what a profile stores and what
/// the shop copies to build a purchase proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub body: String,
    pub engine: String,
    pub tyres: String,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        VehicleConfig {
            body: "fellali".to_owned(),
            engine: "basic".to_owned(),
            tyres: "second_hand".to_owned(),
        }
    }
}

impl VehicleConfig {
    pub fn id_of(&self, kind: PartKind) -> &str {
        match kind {
            PartKind::Body => &self.body,
            PartKind::Engine => &self.engine,
            PartKind::Tyres => &self.tyres,
        }
    }

    pub fn set(&mut self, kind: PartKind, id: &str) {
        let slot = match kind {
            PartKind::Body => &mut self.body,
            PartKind::Engine => &mut self.engine,
            PartKind::Tyres => &mut self.tyres,
        };
        *slot = id.to_owned();
    }

    /// cost returns the summed price of all three parts.
    pub fn cost(&self, catalog: &PartCatalog) -> Result<i64, SetupError> {
        PartKind::ALL
            .iter()
            .map(|&kind| catalog.get(kind, self.id_of(kind)).map(|p| p.price))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerKind {
    Human,
    Computer,
}

/// Vehicle is a live race participant. Rotation is given in degrees, clockwise, with 0 pointing
/// up the y axis. Positive speed moves the car along its heading.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub name: String,
    pub controller: ControllerKind,
    pub position: DVec2,
    pub rotation: f64,
    pub speed: f64,
    pub accel_dir: i32,
    pub rot_dir: i32,
    pub stopping: bool,
    pub scale: f64,
    config: VehicleConfig,
    mass: f64,
    width: f64,
    height: f64,
    tyre_offsets: TyreOffsets,
    power: f64,
    grip: f64,
    friction_multiplier: f64,
    accel_multiplier: f64,
    brake_multiplier: f64,
}

impl Vehicle {
    /// from_config resolves all part identifiers in the catalog. An unknown identifier is a fatal
    /// configuration error.
    pub fn from_config(
        name: &str,
        config: &VehicleConfig,
        catalog: &PartCatalog,
        controller: ControllerKind,
    ) -> Result<Vehicle, SetupError> {
        let mut vehicle = Vehicle {
            name: name.to_owned(),
            controller,
            position: DVec2::ZERO,
            rotation: 0.0,
            speed: 0.0,
            accel_dir: 0,
            rot_dir: 0,
            stopping: false,
            scale: 1.0,
            config: config.to_owned(),
            mass: 1.0,
            width: 0.0,
            height: 0.0,
            tyre_offsets: TyreOffsets::default(),
            power: 0.0,
            grip: 0.0,
            friction_multiplier: 0.0,
            accel_multiplier: 0.0,
            brake_multiplier: 0.0,
        };

        for kind in PartKind::ALL {
            let record = catalog.get(kind, config.id_of(kind))?;
            vehicle.apply_part(record);
        }
        vehicle.set_part_dependant_properties();

        Ok(vehicle)
    }

    fn apply_part(&mut self, record: &PartRecord) {
        match record.coefficients {
            Coefficients::Body {
                mass,
                width,
                height,
                tyre_offsets,
            } => {
                self.mass = mass;
                self.width = width;
                self.height = height;
                self.tyre_offsets = tyre_offsets;
            }
            Coefficients::Engine { power } => self.power = power,
            Coefficients::Tyres { grip } => self.grip = grip,
        }
        self.config.set(record.kind(), &record.id);
    }

    /// equip swaps one part and recomputes the physical coefficients.
    pub fn equip(&mut self, record: &PartRecord) {
        self.apply_part(record);
        self.set_part_dependant_properties();
    }

    fn set_part_dependant_properties(&mut self) {
        self.friction_multiplier = self.grip / self.mass;
        self.accel_multiplier = self.friction_multiplier * self.power;
        self.brake_multiplier = self.friction_multiplier * (10.0 - self.mass);
    }

    /// reset places the car and clears the transient race state. Parts are kept.
    pub fn reset(&mut self, position: DVec2, rotation: f64, scale: f64) {
        self.position = position;
        self.rotation = wrap_degrees(rotation);
        self.scale = scale;
        self.speed = 0.0;
        self.accel_dir = 0;
        self.rot_dir = 0;
        self.stopping = false;
    }

    // ---------------------------------------------------------------------------------------------
    // GETTERS -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn grip(&self) -> f64 {
        self.grip
    }

    pub fn tyre_offsets(&self) -> TyreOffsets {
        self.tyre_offsets
    }

    /// Unscaled body height, the AI sensors are placed relative to it.
    pub fn body_height(&self) -> f64 {
        self.height
    }

    pub fn friction_multiplier(&self) -> f64 {
        self.friction_multiplier
    }

    pub fn accel_multiplier(&self) -> f64 {
        self.accel_multiplier
    }

    pub fn brake_multiplier(&self) -> f64 {
        self.brake_multiplier
    }

    pub fn is_human(&self) -> bool {
        self.controller == ControllerKind::Human
    }

    /// top_speed returns the terminal speed when accelerating in direction `accel_dir` on a
    /// surface with the given friction.
    pub fn top_speed(&self, accel_dir: i32, friction: u8, consts: &SimConstants) -> f64 {
        self.accel_multiplier
            * accel_dir as f64
            * consts.directional_gain(signum(accel_dir as f64))
            * (friction as f64 / 255.0)
    }

    // ---------------------------------------------------------------------------------------------
    // DYNAMICS ------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// apply_input copies the control intent into the car. It is ignored once the car is stopping.
    pub fn apply_input(&mut self, input: ControlInput) {
        if self.stopping {
            return;
        }
        self.accel_dir = input.accel_dir;
        self.rot_dir = input.rot_dir;
    }

    /// stop disables the controls and brakes the car to a standstill.
    pub fn stop(&mut self) {
        self.stopping = true;
        self.rot_dir = 0;
        self.accel_dir = if self.speed == 0.0 { 0 } else { -signum(self.speed) };
    }

    /// calculate_speed returns the speed after `dt` seconds on a surface with the given friction.
    /// The speed itself is not written, but a stopping car loses its acceleration input once it
    /// stands still.
    pub fn calculate_speed(&mut self, dt: f64, friction: u8, consts: &SimConstants) -> f64 {
        let mut speed = self.speed;
        let friction_ratio = friction as f64 / 255.0;

        let accel_sig = signum(self.accel_dir as f64);
        let speed_sig = signum(speed);

        if speed_sig == 0 && accel_sig == 0 {
            return 0.0;
        }

        if accel_sig == speed_sig || speed_sig == 0 {
            // accelerating, the scaled multiplier is both the rate and the top speed
            let speed_multiplier = self.top_speed(self.accel_dir, friction, consts);
            speed += speed_multiplier * dt;

            if speed.abs() > speed_multiplier.abs() {
                speed = speed_multiplier;
            }
        } else {
            let slow_down_multiplier = if accel_sig == 0 {
                self.friction_multiplier
            } else {
                self.friction_multiplier
                    .max(self.brake_multiplier * self.accel_dir.abs() as f64)
            };

            speed -=
                speed_sig as f64 * slow_down_multiplier * consts.brake_gain * friction_ratio * dt;

            if speed * (speed_sig as f64) <= 0.0 {
                speed = 0.0;

                if self.stopping {
                    self.accel_dir = 0;
                }
            }
        }

        speed
    }

    /// update advances speed, rotation and position by `dt` seconds. The move is refused if the
    /// target point has zero friction.
    pub fn update(&mut self, dt: f64, track: &Track, consts: &SimConstants) {
        let friction = track.friction_at(self.position);
        self.speed = self.calculate_speed(dt, friction, consts);

        let rot_factor = (self.speed.abs() / consts.full_turn_speed).min(1.0);
        self.rotation = wrap_degrees(
            self.rotation
                + rot_factor
                    * consts.rotation_speed
                    * self.rot_dir as f64
                    * signum(self.speed) as f64
                    * dt,
        );

        let target = self.position + heading(self.rotation) * (self.speed * dt);
        if track.friction_at(target) > 0 {
            self.position = target;
        }
    }

    /// footprint returns the rotated body rectangle at the current pose.
    pub fn footprint(&self) -> Polygon {
        let r = self.rotation.to_radians();
        let (sina, cosa) = r.sin_cos();

        let w = self.width * self.scale / 2.0;
        let h = self.height * self.scale / 2.0;

        // local x runs to the right of the car, local y along the heading
        let a = DVec2::new(w * cosa + h * sina, -w * sina + h * cosa);
        let b = DVec2::new(-w * cosa + h * sina, w * sina + h * cosa);

        let c = self.position;
        Polygon::new(vec![c + a, c + b, c - a, c - b])
    }
}

/// heading returns the unit vector for a rotation in degrees.
pub fn heading(rotation: f64) -> DVec2 {
    let r = rotation.to_radians();
    DVec2::new(r.sin(), r.cos())
}

/// wrap_degrees maps an angle into [0, 360).
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
