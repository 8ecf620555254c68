//! Fixed wing represented as an actuator line.
//!
//! Points are spread uniformly from `start` to `end`. Each point carries its
//! own chord, smoothing lengths and local frame; forces come from the
//! airfoil polar evaluated at the local angle of attack.

use crate::data::{ActDataHolder, ActGrid};
use crate::error::{ActError, ActResult};
use crate::ops::fllc::{DEFAULT_RELAXATION, FllcData};
use crate::ops::{ActuatorOps, InitContext};
use crate::types::{ActSrcDisk, ActSrcLine, ActTrait, FixedWing, KindTag};
use af_core::{
    BoundingBox, CoreResult, Mat3, Real, Vec3, ensure_finite, is_strictly_increasing, max_of,
    normalized, radians, rotate_about,
};
use af_interp::{AirfoilFormat, AirfoilTable, linear_monotonic};
use af_params::{ActParser, Rule};
use std::sync::Arc;
use tracing::debug;

/// Chord multiples of smoothing covered by the bounding box.
const SEARCH_FACTOR: Real = 3.0;

/// Relative speeds below this produce no force.
const MIN_SPEED: Real = 1e-12;

#[derive(Debug)]
pub struct WingBaseData {
    pub num_pts: usize,
    pub start: Vec3,
    pub end: Vec3,
    /// Degrees, positive nose up about the span axis.
    pub pitch: Real,
    /// Absolute smoothing lengths, input order (chord, span, thickness).
    pub eps_inp: Vec3,
    /// Chord-relative smoothing lengths, input order (chord, span, thickness).
    pub epsilon_chord: Vec3,
    pub span_locs: Vec<Real>,
    pub chord_inp: Vec<Real>,
    /// Chord at each point.
    pub chord: Vec<Real>,
    /// Span length represented by each point.
    pub span_weight: Vec<Real>,
    pub airfoil_file: String,
    pub airfoil_type: String,
    pub aflookup: Option<Arc<AirfoilTable>>,
    pub search_radius: Real,
    pub vel_rel: Vec<Vec3>,
    /// Radians.
    pub aoa: Vec<Real>,
    pub cl: Vec<Real>,
    pub cd: Vec<Real>,
    pub lift: Real,
    pub drag: Real,
    pub fllc: Option<FllcData>,
}

impl Default for WingBaseData {
    fn default() -> Self {
        Self {
            num_pts: 0,
            start: Vec3::zeros(),
            end: Vec3::zeros(),
            pitch: 0.0,
            eps_inp: Vec3::zeros(),
            epsilon_chord: Vec3::zeros(),
            span_locs: vec![0.0, 1.0],
            chord_inp: vec![1.0, 1.0],
            chord: Vec::new(),
            span_weight: Vec::new(),
            airfoil_file: String::new(),
            airfoil_type: AirfoilFormat::default().to_string(),
            aflookup: None,
            search_radius: 0.0,
            vel_rel: Vec::new(),
            aoa: Vec::new(),
            cl: Vec::new(),
            cd: Vec::new(),
            lift: 0.0,
            drag: 0.0,
            fllc: None,
        }
    }
}

/// Reorder an input (chord, span, thickness) vector to the grid frame order
/// (chord, thickness, span).
fn to_frame_order(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

/// Local frame with rows (chord, thickness, span).
///
/// The chord direction is the x axis made orthogonal to the span (the y axis
/// for spans along x) and pitched about the span axis.
pub fn wing_frame(start: &Vec3, end: &Vec3, pitch_deg: Real) -> CoreResult<Mat3> {
    let span = normalized(&(end - start), "wing span")?;
    let mut base = Vec3::x() - span * span.x;
    if base.norm() < 1e-6 {
        base = Vec3::y() - span * span.y;
    }
    let c0 = normalized(&base, "chord direction")?;
    let chord = rotate_about(&span, -radians(pitch_deg), &c0)?;
    let thickness = span.cross(&chord);
    Ok(Mat3::from_rows(&[
        chord.transpose(),
        thickness.transpose(),
        span.transpose(),
    ]))
}

fn check_chord_table(meta: &WingBaseData, label: &str) -> ActResult<()> {
    if meta.span_locs.len() != meta.chord_inp.len() {
        return Err(ActError::geometry(
            label,
            format!(
                "'span_locs' has {} entries but 'chord' has {}",
                meta.span_locs.len(),
                meta.chord_inp.len()
            ),
        ));
    }
    if meta.span_locs.is_empty() {
        return Err(ActError::geometry(label, "chord table is empty"));
    }
    if !is_strictly_increasing(&meta.span_locs) {
        return Err(ActError::geometry(label, "'span_locs' must be strictly increasing"));
    }
    if meta.chord_inp.iter().any(|c| !(*c > 0.0)) {
        return Err(ActError::geometry(label, "'chord' values must be positive"));
    }
    Ok(())
}

/// `max(eps, eps_chord) * max(chord) * 3`, widened so that it never falls
/// short of three times the largest per-point smoothing length.
pub fn compute_search_radius(meta: &WingBaseData) -> Real {
    let max_chord = max_of(&meta.chord_inp).unwrap_or(0.0);
    let max_eps = meta.eps_inp.max();
    let max_epsc = meta.epsilon_chord.max();
    let scaled = max_eps.max(max_epsc) * max_chord * SEARCH_FACTOR;

    let support = (0..3)
        .map(|n| meta.eps_inp[n].max(meta.epsilon_chord[n] * max_chord))
        .fold(0.0, Real::max)
        * SEARCH_FACTOR;
    scaled.max(support)
}

pub fn compute_bounding_box(meta: &WingBaseData) -> BoundingBox {
    BoundingBox::enclosing([&meta.start, &meta.end])
        .unwrap_or_default()
        .expanded(meta.search_radius)
}

pub fn read_wing_inputs(data: &mut ActDataHolder<FixedWing>, pp: &ActParser) -> ActResult<()> {
    let label = pp.label();
    let ActDataHolder { meta, info, .. } = data;

    meta.num_pts = pp.get("num_points")?;
    meta.start = pp.get_vec3("start")?;
    meta.end = pp.get_vec3("end")?;
    pp.query_vec3("epsilon", &mut meta.eps_inp)?;
    pp.query_vec3("epsilon_chord", &mut meta.epsilon_chord)?;
    meta.pitch = pp.get("pitch")?;
    ensure_finite(meta.pitch, "pitch").map_err(|e| ActError::configuration(label, e))?;
    meta.airfoil_file = pp.get("airfoil_table")?;
    pp.query("airfoil_type", &mut meta.airfoil_type)?;
    pp.queryarr("span_locs", &mut meta.span_locs)?;
    pp.queryarr("chord", &mut meta.chord_inp)?;

    let mut use_fllc = false;
    pp.query("fllc", &mut use_fllc)?;
    if use_fllc {
        let mut relaxation = DEFAULT_RELAXATION;
        pp.query("fllc_relaxation", &mut relaxation)?;
        if !(relaxation > 0.0 && relaxation <= 1.0) {
            return Err(ActError::configuration(
                label,
                format!("'fllc_relaxation' must be in (0, 1] (got {relaxation})"),
            ));
        }
        meta.fllc = Some(FllcData::new(relaxation));
    } else if pp.contains("fllc_relaxation") {
        return Err(ActError::configuration(
            label,
            "'fllc_relaxation' is set but 'fllc' is disabled",
        ));
    }

    if meta.num_pts < 2 {
        return Err(ActError::configuration(
            label,
            format!("'num_points' must be at least 2 (got {})", meta.num_pts),
        ));
    }
    check_chord_table(meta, label)?;
    normalized(&(meta.end - meta.start), "wing span").map_err(|e| ActError::from_core(label, e))?;

    meta.search_radius = compute_search_radius(meta);
    if !(meta.search_radius > 0.0) {
        return Err(ActError::configuration(
            label,
            "smoothing radius from 'epsilon'/'epsilon_chord' must be positive",
        ));
    }
    info.bound_box = compute_bounding_box(meta);
    Ok(())
}

/// Allocate the grid and place points uniformly from `start` to `end`,
/// both endpoints included.
pub fn init_data_structures(meta: &mut WingBaseData, grid: &mut ActGrid) {
    let npts = meta.num_pts;
    grid.resize_force_points(npts, true);
    grid.resize_velocity_points(npts);

    let dx = (meta.end - meta.start) / (npts - 1) as Real;
    for i in 0..npts {
        grid.pos[i] = meta.start + dx * i as Real;
        grid.vel_pos[i] = grid.pos[i];
    }

    let ds = dx.norm();
    meta.span_weight = vec![ds; npts];
    meta.span_weight[0] = 0.5 * ds;
    meta.span_weight[npts - 1] = 0.5 * ds;

    meta.vel_rel = vec![Vec3::zeros(); npts];
    meta.aoa = vec![0.0; npts];
    meta.cl = vec![0.0; npts];
    meta.cd = vec![0.0; npts];
}

/// Chord per point from the span table, then per-axis smoothing lengths.
pub fn compute_chord_and_epsilon(
    meta: &mut WingBaseData,
    grid: &mut ActGrid,
    label: &str,
) -> ActResult<()> {
    let npts = meta.num_pts;
    let wlen = (grid.pos[npts - 1] - grid.pos[0]).norm();
    let wx: Vec<Real> = grid.pos.iter().map(|p| (p - grid.pos[0]).norm() / wlen).collect();

    meta.chord = vec![0.0; npts];
    linear_monotonic(&meta.span_locs, &meta.chord_inp, &wx, &mut meta.chord)
        .map_err(|e| ActError::from_interp(label, e))?;

    let eps_abs = to_frame_order(&meta.eps_inp);
    let eps_chord = to_frame_order(&meta.epsilon_chord);
    for (eps, chord) in grid.epsilon.iter_mut().zip(&meta.chord) {
        for n in 0..3 {
            eps[n] = eps_abs[n].max(eps_chord[n] * chord);
        }
    }
    Ok(())
}

impl ActTrait for FixedWing {
    type MetaType = WingBaseData;

    const KIND: KindTag = KindTag::FixedWing;
}

impl ActuatorOps<ActSrcLine> for FixedWing {
    const PARSE_RULES: &'static [Rule] = &[
        Rule::OneOf(&["epsilon", "epsilon_chord"]),
        Rule::Together("span_locs", "chord"),
        Rule::DependsOn {
            independent: "fllc",
            dependent: "fllc_relaxation",
        },
    ];

    fn read_inputs(data: &mut ActDataHolder<Self>, pp: &ActParser) -> ActResult<()> {
        read_wing_inputs(data, pp)
    }

    fn init_data(data: &mut ActDataHolder<Self>, ctx: &mut InitContext<'_>) -> ActResult<()> {
        let ActDataHolder { meta, grid, info } = data;
        let label = info.label.as_str();

        init_data_structures(meta, grid);
        compute_chord_and_epsilon(meta, grid, label)?;

        let frame = wing_frame(&meta.start, &meta.end, meta.pitch)
            .map_err(|e| ActError::from_core(label, e))?;
        grid.orientation.iter_mut().for_each(|o| *o = frame);

        let format: AirfoilFormat = meta
            .airfoil_type
            .parse()
            .map_err(|e| ActError::from_interp(label, e))?;
        let table = ctx
            .airfoils
            .get(&meta.airfoil_file, format)
            .map_err(|e| ActError::from_interp(label, e))?;
        meta.aflookup = Some(table);

        if let Some(fllc) = meta.fllc.as_mut() {
            fllc.init(&grid.pos).map_err(|e| ActError::from_core(label, e))?;
        }
        Ok(())
    }

    fn update_pos(data: &mut ActDataHolder<Self>) -> ActResult<()> {
        let ActDataHolder { meta, grid, info } = data;
        if let Some(fllc) = meta.fllc.as_mut() {
            fllc.update_geometry(&grid.pos)
                .map_err(|e| ActError::from_core(&info.label, e))?;
        }
        Ok(())
    }

    fn update_vel(data: &mut ActDataHolder<Self>) -> ActResult<()> {
        let ActDataHolder { meta, grid, .. } = data;
        meta.vel_rel.copy_from_slice(&grid.vel);
        if let Some(fllc) = meta.fllc.as_ref() {
            for (v, du) in meta.vel_rel.iter_mut().zip(&fllc.correction) {
                *v += du;
            }
        }
        Ok(())
    }

    fn compute_force(data: &mut ActDataHolder<Self>) -> ActResult<()> {
        let ActDataHolder { meta, grid, info } = data;
        let table = meta
            .aflookup
            .clone()
            .ok_or_else(|| ActError::configuration(&info.label, "airfoil table not loaded"))?;

        let npts = meta.num_pts;
        let mut circulation = vec![0.0; npts];
        let mut lift_dirs = vec![Vec3::zeros(); npts];
        let mut lift = 0.0;
        let mut drag = 0.0;

        for i in 0..npts {
            let frame = &grid.orientation[i];
            let c = frame.row(0).transpose();
            let t = frame.row(1).transpose();
            let s = frame.row(2).transpose();

            let v = meta.vel_rel[i];
            let (vc, vt) = (v.dot(&c), v.dot(&t));
            let v_in = c * vc + t * vt;
            let speed = v_in.norm();

            let aoa = vt.atan2(vc);
            let (cl, cd) = table.lookup(aoa);
            meta.aoa[i] = aoa;
            meta.cl[i] = cl;
            meta.cd[i] = cd;

            if speed < MIN_SPEED {
                grid.force[i] = Vec3::zeros();
                continue;
            }
            let drag_dir = v_in / speed;
            let lift_dir = s.cross(&drag_dir);
            let q = 0.5 * grid.density[i] * speed * speed * meta.chord[i] * meta.span_weight[i];

            // Force on the fluid opposes the force on the wing
            grid.force[i] = -(lift_dir * (q * cl) + drag_dir * (q * cd));
            lift += q * cl;
            drag += q * cd;
            circulation[i] = 0.5 * speed * meta.chord[i] * cl;
            lift_dirs[i] = lift_dir;
        }
        meta.lift = lift;
        meta.drag = drag;

        if let Some(fllc) = meta.fllc.as_mut() {
            let eps_les: Vec<Real> = grid.epsilon.iter().map(|e| e.x).collect();
            fllc.compute_correction(&circulation, &meta.chord, &eps_les, &lift_dirs);
        }

        debug!(label = %info.label, lift, drag, "fixed wing forces");
        Ok(())
    }

    fn scalars(data: &ActDataHolder<Self>) -> Vec<(&'static str, Real)> {
        let meta = &data.meta;
        let n = meta.aoa.len().max(1) as Real;
        let mut out = vec![
            ("lift", meta.lift),
            ("drag", meta.drag),
            ("aoa_mean_deg", meta.aoa.iter().sum::<Real>().to_degrees() / n),
        ];
        if let Some(fllc) = &meta.fllc {
            out.push(("fllc_max_correction", fllc.max_correction()));
        }
        out
    }
}

// A fixed wing has no disk-source behavior.
impl ActuatorOps<ActSrcDisk> for FixedWing {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_right_handed_and_orthonormal() {
        let frame = wing_frame(&Vec3::zeros(), &Vec3::new(0.0, 0.0, 10.0), 7.0).unwrap();
        let c = frame.row(0).transpose();
        let t = frame.row(1).transpose();
        let s = frame.row(2).transpose();
        assert!((c.cross(&t) - s).norm() < 1e-12);
        assert!((frame * frame.transpose() - Mat3::identity()).norm() < 1e-12);
    }

    #[test]
    fn positive_pitch_gives_positive_aoa() {
        let frame = wing_frame(&Vec3::zeros(), &Vec3::new(0.0, 0.0, 10.0), 5.0).unwrap();
        let v = Vec3::new(10.0, 0.0, 0.0);
        let vc = v.dot(&frame.row(0).transpose());
        let vt = v.dot(&frame.row(1).transpose());
        assert!((vt.atan2(vc).to_degrees() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn span_along_x_uses_y_chord() {
        let frame = wing_frame(&Vec3::zeros(), &Vec3::x(), 0.0).unwrap();
        assert!((frame.row(0).transpose() - Vec3::y()).norm() < 1e-12);
    }

    #[test]
    fn zero_span_is_degenerate() {
        assert!(wing_frame(&Vec3::x(), &Vec3::x(), 0.0).is_err());
    }

    #[test]
    fn search_radius_uses_largest_smoothing() {
        let meta = WingBaseData {
            eps_inp: Vec3::new(0.5, 0.5, 0.5),
            epsilon_chord: Vec3::new(2.0, 1.0, 0.25),
            chord_inp: vec![1.0, 3.0],
            ..Default::default()
        };
        assert!((compute_search_radius(&meta) - 18.0).abs() < 1e-12);
    }

    #[test]
    fn search_radius_covers_absolute_epsilon_on_short_chords() {
        let meta = WingBaseData {
            eps_inp: Vec3::repeat(2.0),
            chord_inp: vec![0.5, 0.5],
            ..Default::default()
        };
        assert!((compute_search_radius(&meta) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn chord_table_checks() {
        let meta = WingBaseData {
            span_locs: vec![0.0, 0.5, 1.0],
            chord_inp: vec![1.0, 2.0],
            ..Default::default()
        };
        let err = check_chord_table(&meta, "W1").unwrap_err();
        assert!(matches!(err, ActError::Geometry { .. }));

        let meta = WingBaseData {
            span_locs: vec![0.0, 0.0],
            ..Default::default()
        };
        assert!(check_chord_table(&meta, "W1").is_err());
    }

    #[test]
    fn endpoints_get_half_span_weight() {
        let mut meta = WingBaseData {
            num_pts: 5,
            end: Vec3::new(0.0, 8.0, 0.0),
            ..Default::default()
        };
        let mut grid = ActGrid::default();
        init_data_structures(&mut meta, &mut grid);
        assert_eq!(grid.pos[4], Vec3::new(0.0, 8.0, 0.0));
        assert_eq!(meta.span_weight, vec![1.0, 2.0, 2.0, 2.0, 1.0]);
        assert!((meta.span_weight.iter().sum::<Real>() - 8.0).abs() < 1e-12);
    }
}
