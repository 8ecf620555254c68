//! Uniform thrust-coefficient rotor disk.
//!
//! The disk is discretized as `num_points_r` radial bands of
//! `num_points_t` azimuthal points. Velocity is sampled on two planes: a
//! reference plane `diameters_to_sample` rotor diameters upstream and the
//! disk plane itself. The thrust coefficient is looked up against the
//! upstream speed; the disk-plane average is reported alongside it.

use crate::data::{ActDataHolder, ActGrid};
use crate::error::{ActError, ActResult};
use crate::ops::{ActuatorOps, InitContext};
use crate::types::{ActSrcDisk, ActSrcLine, ActTrait, KindTag, UniformCt};
use af_core::units::{
    Area, Density, Force, Power, Velocity, constants::RHO_AIR, kgpm3, m2, mps, newtons, watts,
};
use af_core::{BoundingBox, CoreResult, Real, Vec3, normalized, radians, rotate_about};
use af_interp::{SharedTable, Table};
use af_params::{ActParser, Rule};
use std::f64::consts::{PI, TAU};
use tracing::debug;

pub const DEFAULT_DIAMETERS_TO_SAMPLE: Real = 2.5;

/// Reference plane plus disk plane.
pub const NUM_SAMPLE_PLANES: usize = 2;

/// Smoothing lengths covered by the bounding box.
const SEARCH_FACTOR: Real = 3.0;

/// Metadata shared by disk-type actuators.
#[derive(Debug)]
pub struct DiskBaseData {
    pub num_force_pts: usize,
    pub num_vel_pts: usize,
    pub num_vel_pts_r: usize,
    pub num_vel_pts_t: usize,
    pub num_sample_planes: usize,
    pub diameter: Real,
    pub epsilon: Real,
    /// Parsed value until the first velocity update, sampled afterwards.
    pub density: Real,
    pub diameters_to_sample: Real,
    pub center: Vec3,
    pub normal_vec: Vec3,
    pub coplanar_vec: Vec3,
    pub reference_velocity: Vec3,
    pub mean_disk_velocity: Vec3,
    /// Inflow speed -> thrust coefficient.
    pub thrust_table: Option<SharedTable>,
    pub current_ct: Real,
    pub u_inf_sqr: Real,
    pub thrust: Real,
    pub power: Real,
}

impl Default for DiskBaseData {
    fn default() -> Self {
        Self {
            num_force_pts: 0,
            num_vel_pts: 0,
            num_vel_pts_r: 0,
            num_vel_pts_t: 0,
            num_sample_planes: NUM_SAMPLE_PLANES,
            diameter: 0.0,
            epsilon: 0.0,
            density: RHO_AIR,
            diameters_to_sample: DEFAULT_DIAMETERS_TO_SAMPLE,
            center: Vec3::zeros(),
            normal_vec: Vec3::x(),
            coplanar_vec: Vec3::z(),
            reference_velocity: Vec3::zeros(),
            mean_disk_velocity: Vec3::zeros(),
            thrust_table: None,
            current_ct: 0.0,
            u_inf_sqr: 0.0,
            thrust: 0.0,
            power: 0.0,
        }
    }
}

impl DiskBaseData {
    pub fn radius(&self) -> Real {
        0.5 * self.diameter
    }

    /// Points per sample plane.
    pub fn points_per_plane(&self) -> usize {
        self.num_vel_pts_r * self.num_vel_pts_t
    }

    /// Axial offset of sample plane `plane` along the normal. Plane 0 is
    /// the upstream reference plane, the last plane is the disk plane.
    pub fn plane_offset(&self, plane: usize) -> Real {
        if self.num_sample_planes < 2 {
            return 0.0;
        }
        let frac = plane as Real / (self.num_sample_planes - 1) as Real;
        -self.diameters_to_sample * self.diameter * (1.0 - frac)
    }
}

/// Disk totals in SI units.
#[derive(Clone, Copy, Debug)]
pub struct DiskSummary {
    pub thrust: Force,
    pub power: Power,
    pub u_inf: Velocity,
    pub rotor_area: Area,
    pub density: Density,
}

pub fn summary(meta: &DiskBaseData) -> DiskSummary {
    let r = meta.radius();
    DiskSummary {
        thrust: newtons(meta.thrust),
        power: watts(meta.power),
        u_inf: mps(meta.u_inf_sqr.sqrt()),
        rotor_area: m2(PI * r * r),
        density: kgpm3(meta.density),
    }
}

/// Area bookkeeping for equal-width radial bands.
#[derive(Clone, Copy, Debug)]
pub struct AreaComputer {
    area: Real,
    dr: Real,
    num_theta: usize,
}

impl AreaComputer {
    pub fn new(radius: Real, num_r: usize, num_theta: usize) -> Self {
        Self {
            area: PI * radius * radius,
            dr: radius / num_r as Real,
            num_theta,
        }
    }

    pub fn total_area(&self) -> Real {
        self.area
    }

    /// Area of annulus `i`: `pi dr^2 ((i+1)^2 - i^2)`.
    pub fn area_section(&self, i: usize) -> Real {
        PI * self.dr * self.dr * (2 * i + 1) as Real
    }

    /// Fraction of the disk covered by annulus `i`.
    pub fn weight(&self, i: usize) -> Real {
        self.area_section(i) / self.area
    }

    /// Weight of one azimuthal sample in annulus `i`.
    pub fn point_weight(&self, i: usize) -> Real {
        self.weight(i) / self.num_theta as Real
    }
}

/// Unit normal from yaw (about z) and tilt (about the horizontal), degrees.
pub fn normal_from_angles(yaw_deg: Real, tilt_deg: Real) -> Vec3 {
    let (yaw, tilt) = (radians(yaw_deg), radians(tilt_deg));
    Vec3::new(yaw.cos() * tilt.cos(), yaw.sin() * tilt.cos(), tilt.sin())
}

/// In-plane direction for a unit `normal`: the component of the vertical
/// axis orthogonal to the normal, or of the x axis for near-vertical normals.
pub fn compute_coplanar_vector(normal: &Vec3) -> Vec3 {
    let reference = if normal.z.abs() > 0.99 {
        Vec3::x()
    } else {
        Vec3::z()
    };
    normal.cross(&reference.cross(normal))
}

pub fn required_parameters(meta: &mut DiskBaseData, pp: &ActParser) -> ActResult<()> {
    meta.center = pp.get_vec3("disk_center")?;
    meta.diameter = pp.get("rotor_diameter")?;
    meta.num_vel_pts_r = pp.get("num_points_r")?;
    meta.num_vel_pts_t = pp.get("num_points_t")?;
    meta.epsilon = pp.get("epsilon")?;

    let ct: Vec<Real> = pp.getarr("thrust_coeff")?;
    let speeds: Vec<Real> = pp.getarr("wind_speed")?;
    let table = Table::shared("thrust_coeff", speeds, ct)
        .map_err(|e| ActError::from_interp(pp.label(), e))?;
    meta.thrust_table = Some(table);
    Ok(())
}

pub fn optional_parameters(meta: &mut DiskBaseData, pp: &ActParser) -> ActResult<()> {
    pp.query("density", &mut meta.density)?;
    pp.query("diameters_to_sample", &mut meta.diameters_to_sample)?;

    if !pp.query_vec3("disk_normal", &mut meta.normal_vec)? {
        let mut yaw = 0.0;
        if pp.query("yaw", &mut yaw)? {
            let mut tilt = 0.0;
            pp.query("tilt", &mut tilt)?;
            meta.normal_vec = normal_from_angles(yaw, tilt);
        }
    }
    Ok(())
}

/// Value-range checks; all failures reported together.
pub fn final_checks(meta: &DiskBaseData, label: &str) -> ActResult<()> {
    let mut problems = Vec::new();
    if !(meta.diameter > 0.0) {
        problems.push(format!("'rotor_diameter' must be positive (got {})", meta.diameter));
    }
    if !(meta.epsilon > 0.0) {
        problems.push(format!("'epsilon' must be positive (got {})", meta.epsilon));
    }
    if meta.num_vel_pts_r == 0 {
        problems.push("'num_points_r' must be at least 1".to_string());
    }
    if meta.num_vel_pts_t == 0 {
        problems.push("'num_points_t' must be at least 1".to_string());
    }
    if !(meta.density > 0.0) {
        problems.push(format!("'density' must be positive (got {})", meta.density));
    }
    if !(meta.diameters_to_sample >= 0.0) {
        problems.push(format!(
            "'diameters_to_sample' must be non-negative (got {})",
            meta.diameters_to_sample
        ));
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ActError::configuration(label, problems.join("; ")))
    }
}

pub fn compute_and_normalize_coplanar_vector(meta: &mut DiskBaseData) -> CoreResult<()> {
    meta.normal_vec = normalized(&meta.normal_vec, "disk normal")?;
    meta.coplanar_vec = normalized(&compute_coplanar_vector(&meta.normal_vec), "coplanar vector")?;
    Ok(())
}

/// Exact axis-aligned extent of the disk circle grown by the search radius.
pub fn compute_bounding_box(meta: &DiskBaseData) -> BoundingBox {
    let r = meta.radius();
    let search = SEARCH_FACTOR * meta.epsilon;
    let n = &meta.normal_vec;
    let c = &meta.center;
    let mut lo = [0.0; 3];
    let mut hi = [0.0; 3];
    for k in 0..3 {
        let extent = r * (1.0 - n[k] * n[k]).max(0.0).sqrt() + search;
        lo[k] = c[k] - extent;
        hi[k] = c[k] + extent;
    }
    BoundingBox::new(lo, hi)
}

/// Fill `points[offset..offset + num_r * num_t]` with ring points shifted by
/// `d_offset` along `axis`. Ring `i` sits at radius `(i + 0.5) dr`.
pub fn compute_disk_points(
    meta: &DiskBaseData,
    points: &mut [Vec3],
    axis: &Vec3,
    offset: usize,
    d_offset: Real,
) -> CoreResult<()> {
    let nr = meta.num_vel_pts_r;
    let nt = meta.num_vel_pts_t;
    let dr = meta.radius() / nr as Real;
    let dt = TAU / nt as Real;
    let plane_center = meta.center + axis * d_offset;

    for i in 0..nr {
        let r = (i as Real + 0.5) * dr;
        for j in 0..nt {
            let theta = j as Real * dt;
            let dir = rotate_about(axis, theta, &meta.coplanar_vec)?;
            points[offset + i * nt + j] = plane_center + dir * r;
        }
    }
    Ok(())
}

pub fn allocate_basic_grid_quantities(meta: &DiskBaseData, grid: &mut ActGrid) {
    grid.resize_force_points(meta.num_force_pts, false);
    grid.resize_velocity_points(meta.num_vel_pts);
}

/// Parse inputs and derive the disk geometry.
pub fn parse_and_gather_params(
    data: &mut ActDataHolder<UniformCt>,
    pp: &ActParser,
) -> ActResult<()> {
    let meta = &mut data.meta;
    required_parameters(meta, pp)?;
    optional_parameters(meta, pp)?;
    final_checks(meta, pp.label())?;

    compute_and_normalize_coplanar_vector(meta).map_err(|e| ActError::from_core(pp.label(), e))?;
    meta.num_force_pts = meta.points_per_plane();
    meta.num_vel_pts = meta.num_sample_planes * meta.points_per_plane();
    data.info.bound_box = compute_bounding_box(meta);
    Ok(())
}

/// Area-weighted averages over the sample planes.
///
/// The reference plane feeds `reference_velocity` and `density`, the disk
/// plane feeds `mean_disk_velocity`. Both use the same per-band weights.
pub fn area_weighted_average(meta: &mut DiskBaseData, grid: &ActGrid) {
    let num_r = meta.num_vel_pts_r;
    let num_t = meta.num_vel_pts_t;
    let disk_offset = (meta.num_sample_planes - 1) * meta.points_per_plane();
    let area = AreaComputer::new(meta.radius(), num_r, num_t);

    let mut ref_vel = Vec3::zeros();
    let mut disk_vel = Vec3::zeros();
    let mut density = 0.0;
    for i in 0..num_r {
        let weight = area.point_weight(i);
        for j in 0..num_t {
            let k = j + i * num_t;
            density += grid.density[k] * weight;
            ref_vel += grid.vel[k] * weight;
            disk_vel += grid.vel[k + disk_offset] * weight;
        }
    }
    meta.reference_velocity = ref_vel;
    meta.mean_disk_velocity = disk_vel;
    meta.density = density;
}

/// Square of the reference velocity's normal component; never negative.
pub fn compute_reference_velocity_sqr(meta: &DiskBaseData) -> Real {
    let un = meta.reference_velocity.dot(&meta.normal_vec);
    un * un
}

/// Look up and cache the thrust coefficient for `u_inf_sqr`.
pub fn set_thrust_coefficient(
    meta: &mut DiskBaseData,
    u_inf_sqr: Real,
    label: &str,
) -> ActResult<()> {
    let table = meta
        .thrust_table
        .as_ref()
        .ok_or_else(|| ActError::configuration(label, "thrust table not loaded"))?;
    meta.current_ct = table.eval(u_inf_sqr.sqrt());
    meta.u_inf_sqr = u_inf_sqr;
    Ok(())
}

impl ActTrait for UniformCt {
    type MetaType = DiskBaseData;

    const KIND: KindTag = KindTag::UniformCt;
}

impl ActuatorOps<ActSrcDisk> for UniformCt {
    const PARSE_RULES: &'static [Rule] = &[
        Rule::Conflict("disk_normal", "yaw"),
        Rule::Conflict("disk_normal", "tilt"),
        Rule::DependsOn {
            independent: "yaw",
            dependent: "tilt",
        },
        Rule::Together("thrust_coeff", "wind_speed"),
    ];

    fn read_inputs(data: &mut ActDataHolder<Self>, pp: &ActParser) -> ActResult<()> {
        parse_and_gather_params(data, pp)
    }

    fn init_data(data: &mut ActDataHolder<Self>, _ctx: &mut InitContext<'_>) -> ActResult<()> {
        let ActDataHolder { meta, grid, info } = data;
        allocate_basic_grid_quantities(meta, grid);

        let axis = meta.normal_vec;
        let geometry = |e| ActError::from_core(&info.label, e);
        compute_disk_points(meta, &mut grid.pos, &axis, 0, 0.0).map_err(geometry)?;
        let eps = Vec3::repeat(meta.epsilon);
        grid.epsilon.iter_mut().for_each(|e| *e = eps);

        let np = meta.points_per_plane();
        for plane in 0..meta.num_sample_planes {
            let d_offset = meta.plane_offset(plane);
            compute_disk_points(meta, &mut grid.vel_pos, &axis, plane * np, d_offset)
                .map_err(geometry)?;
        }
        Ok(())
    }

    // Disks are stationary.
    fn update_pos(_data: &mut ActDataHolder<Self>) -> ActResult<()> {
        Ok(())
    }

    fn update_vel(data: &mut ActDataHolder<Self>) -> ActResult<()> {
        area_weighted_average(&mut data.meta, &data.grid);
        Ok(())
    }

    fn compute_force(data: &mut ActDataHolder<Self>) -> ActResult<()> {
        let ActDataHolder { meta, grid, info } = data;
        let u_inf_sqr = compute_reference_velocity_sqr(meta);
        set_thrust_coefficient(meta, u_inf_sqr, &info.label)?;

        let num_t = meta.num_vel_pts_t;
        let area = AreaComputer::new(meta.radius(), meta.num_vel_pts_r, num_t);
        let q = 0.5 * meta.density * u_inf_sqr * meta.current_ct;
        let mut thrust = 0.0;
        for i in 0..meta.num_vel_pts_r {
            let f = q * area.area_section(i) / num_t as Real;
            for j in 0..num_t {
                grid.force[i * num_t + j] = -meta.normal_vec * f;
                thrust += f;
            }
        }
        meta.thrust = thrust;
        meta.power = thrust * meta.mean_disk_velocity.dot(&meta.normal_vec).abs();

        debug!(
            label = %info.label,
            ct = meta.current_ct,
            u_inf = u_inf_sqr.sqrt(),
            thrust = meta.thrust,
            "uniform ct disk forces"
        );
        Ok(())
    }

    fn scalars(data: &ActDataHolder<Self>) -> Vec<(&'static str, Real)> {
        let meta = &data.meta;
        vec![
            ("ct", meta.current_ct),
            ("u_inf", meta.u_inf_sqr.sqrt()),
            ("ref_vel_x", meta.reference_velocity.x),
            ("ref_vel_y", meta.reference_velocity.y),
            ("ref_vel_z", meta.reference_velocity.z),
            ("disk_vel_x", meta.mean_disk_velocity.x),
            ("disk_vel_y", meta.mean_disk_velocity.y),
            ("disk_vel_z", meta.mean_disk_velocity.z),
            ("density", meta.density),
            ("thrust", meta.thrust),
            ("power", meta.power),
        ]
    }
}

// A uniform-ct disk has no line-source behavior.
impl ActuatorOps<ActSrcLine> for UniformCt {}
