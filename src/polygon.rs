use std::f32::consts::PI;

use anyhow::{bail, Result};
use ultraviolet::Vec3;

pub const CENTER_INDEX: u32 = 0;

/// Largest fan whose `3 * n` element count still fits a `GLsizei`.
pub const MAX_VERTEX_COUNT: usize = i32::MAX as usize / 3;

/// A triangle fan around the origin, stored as an indexed triangle list.
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn fan(n: usize, radius: f32) -> Result<Self> {
        if n < 3 {
            bail!("A fan needs at least 3 perimeter vertices, got {n}");
        }
        if n > MAX_VERTEX_COUNT {
            bail!("Too many perimeter vertices: {n} (at most {MAX_VERTEX_COUNT})");
        }
        if !radius.is_finite() || radius <= 0. {
            bail!("Invalid fan radius: {radius}");
        }

        Ok(Self {
            vertices: vertices(n, radius),
            indices: indices(n),
        })
    }

    pub fn index_count(&self) -> usize {
        self.indices.len() * 3
    }
}

/// Center vertex followed by `n` vertices evenly spaced on the circle.
pub fn vertices(n: usize, radius: f32) -> Vec<Vec3> {
    let step = (2. * PI) / n as f32;

    std::iter::once(Vec3::zero())
        .chain((0..n).map(|i| {
            let (sin, cos) = (step * i as f32).sin_cos();
            Vec3::new(radius * cos, radius * sin, 0.)
        }))
        .collect()
}

pub fn indices(n: usize) -> Vec<[u32; 3]> {
    (1..=n)
        .map(|i| [CENTER_INDEX, i as u32, ((i % n) + 1) as u32])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn center_comes_first() {
        let vertices = vertices(30, 0.5);

        assert_eq!(vertices.len(), 31);
        assert_eq!(vertices[0], Vec3::zero());
    }

    #[test]
    fn perimeter_lies_on_circle() {
        for v in &vertices(17, 0.75)[1..] {
            assert!((v.mag() - 0.75).abs() < EPSILON, "{v:?} off the circle");
            assert_eq!(v.z, 0.);
        }
    }

    #[test]
    fn first_perimeter_vertex_on_positive_x() {
        let vertices = vertices(4, 1.);

        assert!((vertices[1].x - 1.).abs() < EPSILON);
        assert!(vertices[1].y.abs() < EPSILON);
        assert!(vertices[2].x.abs() < EPSILON);
        assert!((vertices[2].y - 1.).abs() < EPSILON);
    }

    #[test]
    fn triangle_indices() {
        assert_eq!(indices(3), vec![[0, 1, 2], [0, 2, 3], [0, 3, 1]]);
    }

    #[test]
    fn last_triangle_closes_fan() {
        let indices = indices(30);

        assert_eq!(indices.len(), 30);
        assert_eq!(indices[29], [0, 30, 1]);
    }

    #[test]
    fn indices_stay_in_bounds() {
        let mesh = Mesh::fan(64, 0.5).unwrap();

        assert_eq!(mesh.index_count(), 64 * 3);
        assert!(mesh
            .indices
            .iter()
            .flatten()
            .all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn rejects_undrawable_fans() {
        let err = Mesh::fan(MAX_VERTEX_COUNT + 1, 0.5).err().unwrap();

        assert!(err.to_string().contains("Too many perimeter vertices"));
        assert!(i32::try_from(MAX_VERTEX_COUNT * 3).is_ok());
        assert!(i32::try_from((MAX_VERTEX_COUNT + 1) * 3).is_err());
    }

    #[test]
    fn rejects_degenerate_fans() {
        assert!(Mesh::fan(2, 0.5).is_err());
        assert!(Mesh::fan(3, 0.).is_err());
        assert!(Mesh::fan(3, f32::NAN).is_err());
        assert!(Mesh::fan(3, 0.5).is_ok());
    }
}
