/// Vertex and face generators for planar grids and cylindrical tubes
use std::f64::consts::TAU;

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToposError};
use crate::faces::FaceArray;
use crate::vertices::{CoordinateArray, System};

// Generators come in `<shape>_vertices` / `<shape>_faces` pairs. Face
// indices are 1-based and follow vertex raster order, first coordinate
// varying fastest.

/// Extents of a planar grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneParams {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Default for PlaneParams {
    fn default() -> Self {
        Self {
            xmin: 0.0,
            xmax: 1.0,
            ymin: 0.0,
            ymax: 1.0,
        }
    }
}

/// Radius and extents of a cylindrical tube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeParams {
    pub radius: f64,
    pub zmin: f64,
    pub zmax: f64,
    pub theta_min: f64,
    pub theta_max: f64,
}

impl Default for TubeParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            zmin: 0.0,
            zmax: 1.0,
            theta_min: 0.0,
            theta_max: TAU,
        }
    }
}

/// `n` evenly spaced values from `start` towards `stop`.
///
/// With `endpoint` the last value is exactly `stop`; without it the values
/// stop one step short.
pub fn linspace(start: f64, stop: f64, n: usize, endpoint: bool) -> Vec<f64> {
    let div = if endpoint { n.saturating_sub(1) } else { n };
    let step = if div > 0 {
        (stop - start) / div as f64
    } else {
        0.0
    };

    let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    if endpoint && n > 1 {
        values[n - 1] = stop;
    }
    values
}

fn positive(argument: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(ToposError::InvalidCount { argument, value });
    }
    Ok(())
}

/// An `n × n` grid of `(x, y, 0)` points covering
/// `[xmin, xmax] × [ymin, ymax]`, `x` varying fastest.
pub fn planar_vertices(n: usize, params: &PlaneParams) -> Result<CoordinateArray> {
    positive("n", n)?;

    let xs = linspace(params.xmin, params.xmax, n, true);
    let ys = linspace(params.ymin, params.ymax, n, true);

    let data = ys
        .iter()
        .flat_map(|&y| xs.iter().map(move |&x| Vector3::new(x, y, 0.0)))
        .collect::<Vec<_>>();

    debug!("generated planar grid of {} vertices", data.len());
    Ok(CoordinateArray::new(System::Cartesian, data))
}

/// Quads over an `n × n` vertex grid.
///
/// Each face lists its corners counter-clockwise from the lower left:
///
/// ```text
/// 4 --- 3
/// |     |
/// 1 --- 2
/// ```
///
/// Every vertex outside the rightmost column and the top row anchors one
/// face, in raster order, giving `(n - 1)²` faces.
pub fn planar_faces(n: usize) -> Result<FaceArray> {
    positive("n", n)?;

    let faces = FaceArray::quads((1..n * (n - 1)).filter(|i| i % n != 0).map(|ll| {
        [ll, ll + 1, ll + n + 1, ll + n]
    }));

    debug!("generated {} planar faces", faces.len());
    Ok(faces)
}

/// An `n_theta × n_z` tube of `(θ, z, r)` points, `θ` varying fastest.
///
/// The endpoint `theta_max` is included only when it is below `2π`, so a
/// full turn does not place two vertices at the same angle.
pub fn cylindrical_vertices(
    n_theta: usize,
    n_z: usize,
    params: &TubeParams,
) -> Result<CoordinateArray> {
    positive("n_theta", n_theta)?;
    positive("n_z", n_z)?;

    let endpoint = params.theta_max < TAU;
    let ts = linspace(params.theta_min, params.theta_max, n_theta, endpoint);
    let zs = linspace(params.zmin, params.zmax, n_z, true);
    let r = params.radius;

    let data = zs
        .iter()
        .flat_map(|&z| ts.iter().map(move |&t| Vector3::new(t, z, r)))
        .collect::<Vec<_>>();

    debug!(
        "generated tube of {} vertices ({} x {})",
        data.len(),
        n_theta,
        n_z
    );
    Ok(CoordinateArray::new(System::Cylindrical, data))
}

/// Quads over an `n_theta × n_z` tube of vertices.
///
/// With `close_loop` each band of constant `z` gets one more face joining
/// its last column back to its first. A right-hand corner that runs past
/// the end of its band is folded back by `n_theta` onto the band's first
/// column, so no index exceeds `n_theta * n_z`. The fold is a full band
/// width of `n_theta`; folding by `n_theta - 1` would land one column short
/// and give the closing face a crossed corner.
///
/// Produces `(n_theta - 1 + close_loop) * (n_z - 1)` faces.
pub fn cylindrical_faces(n_theta: usize, n_z: usize, close_loop: bool) -> Result<FaceArray> {
    positive("n_theta", n_theta)?;
    positive("n_z", n_z)?;

    let last = n_theta + usize::from(close_loop);
    let mut rows = Vec::with_capacity((last - 1) * (n_z - 1));

    for j in 0..n_z - 1 {
        for i in 1..last {
            let lower_left = j * n_theta + i;
            let mut lower_right = lower_left + 1;
            let upper_left = (j + 1) * n_theta + i;
            let mut upper_right = upper_left + 1;

            // Only the right-hand corners can leave their band.
            if lower_right > (j + 1) * n_theta {
                lower_right -= n_theta;
            }
            if upper_right > (j + 2) * n_theta {
                upper_right -= n_theta;
            }

            rows.push([lower_left, lower_right, upper_right, upper_left]);
        }
    }

    debug!("generated {} tube faces (closed: {})", rows.len(), close_loop);
    Ok(FaceArray::quads(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 3, true), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(0.0, 1.0, 4, false), vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(linspace(2.0, 5.0, 1, true), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0, true).is_empty());
    }

    #[test]
    fn test_planar_vertices_3() {
        let vs = planar_vertices(3, &PlaneParams::default()).unwrap();
        assert_eq!(vs.len(), 9);
        assert_eq!(vs.system(), System::Cartesian);
        assert_eq!(vs.x(), vec![0.0, 0.5, 1.0, 0.0, 0.5, 1.0, 0.0, 0.5, 1.0]);
        assert_eq!(vs.y(), vec![0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0]);
        assert!(vs.z().iter().all(|&z| z == 0.0));
    }

    #[test]
    fn test_planar_vertices_extents() {
        let params = PlaneParams {
            xmin: -2.0,
            xmax: 3.5,
            ymin: 10.0,
            ymax: 11.0,
        };
        let vs = planar_vertices(7, &params).unwrap();
        let xs = vs.x();
        let ys = vs.y();

        assert_eq!(xs.iter().cloned().fold(f64::INFINITY, f64::min), -2.0);
        assert_eq!(xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 3.5);
        assert_eq!(ys.iter().cloned().fold(f64::INFINITY, f64::min), 10.0);
        assert_eq!(ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 11.0);
    }

    #[test]
    fn test_planar_faces_3() {
        let fs = planar_faces(3).unwrap();
        let rows: Vec<&[usize]> = fs.rows().collect();
        assert_eq!(
            rows,
            vec![
                &[1, 2, 5, 4][..],
                &[2, 3, 6, 5][..],
                &[4, 5, 8, 7][..],
                &[5, 6, 9, 8][..],
            ]
        );
    }

    #[test]
    fn test_planar_faces_small() {
        assert!(planar_faces(1).unwrap().is_empty());
        assert_eq!(planar_faces(2).unwrap().indices(), &[1, 2, 4, 3]);
        assert_eq!(
            planar_faces(0),
            Err(ToposError::InvalidCount {
                argument: "n",
                value: 0
            })
        );
    }

    #[test]
    fn test_cylindrical_vertices_full_turn() {
        let vs = cylindrical_vertices(4, 2, &TubeParams::default()).unwrap();
        assert_eq!(vs.system(), System::Cylindrical);
        assert_eq!(vs.len(), 8);

        let ts = vs.t();
        for (t, expected) in ts[..4].iter().zip([0.0, 0.25, 0.5, 0.75]) {
            assert_relative_eq!(*t, expected * TAU);
        }
        assert_eq!(vs.data()[4][1], 1.0);
        assert!(vs.data().iter().all(|row| row[2] == 1.0));
    }

    #[test]
    fn test_cylindrical_vertices_open_arc() {
        let params = TubeParams {
            theta_max: std::f64::consts::PI,
            ..TubeParams::default()
        };
        let vs = cylindrical_vertices(3, 1, &params).unwrap();
        let ts: Vec<f64> = vs.data().iter().map(|row| row[0]).collect();
        assert_eq!(ts, vec![0.0, std::f64::consts::FRAC_PI_2, std::f64::consts::PI]);
    }

    #[test]
    fn test_cylindrical_vertices_invalid_count() {
        assert!(matches!(
            cylindrical_vertices(0, 3, &TubeParams::default()),
            Err(ToposError::InvalidCount {
                argument: "n_theta",
                ..
            })
        ));
    }

    #[test]
    fn test_cylindrical_faces_open_matches_planar() {
        let tube = cylindrical_faces(5, 5, false).unwrap();
        let plane = planar_faces(5).unwrap();
        assert_eq!(tube, plane);
    }

    #[test]
    fn test_cylindrical_faces_closed() {
        let fs = cylindrical_faces(3, 2, true).unwrap();
        let rows: Vec<&[usize]> = fs.rows().collect();
        assert_eq!(
            rows,
            vec![&[1, 2, 5, 4][..], &[2, 3, 6, 5][..], &[3, 1, 4, 6][..]]
        );
    }

    #[test]
    fn test_cylindrical_faces_counts() {
        assert_eq!(cylindrical_faces(6, 4, false).unwrap().len(), 5 * 3);
        assert_eq!(cylindrical_faces(6, 4, true).unwrap().len(), 6 * 3);
        assert!(cylindrical_faces(6, 1, true).unwrap().is_empty());
    }
}
