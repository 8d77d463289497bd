//! Point cloud data structures and functionality

use crate::point::*;
use std::ops::Index;

/// A generic point cloud container
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// A point cloud ready for upload to the GPU
pub type VertexCloud = PointCloud<PointVertex>;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extent(&self) -> Vector3f {
        self.max - self.min
    }
}

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
        }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }

    /// Borrow the points as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.points
    }
}

impl PointCloud<PointVertex> {
    /// Bounding box of all vertex positions, `None` for an empty cloud
    pub fn bounds(&self) -> Option<Aabb> {
        let first = self.points.first()?.point();
        let bounds = self.points.iter().skip(1).fold(
            Aabb { min: first, max: first },
            |acc, vertex| {
                let p = vertex.point();
                Aabb {
                    min: acc.min.inf(&p),
                    max: acc.max.sup(&p),
                }
            },
        );
        Some(bounds)
    }

    /// Whether any vertex has a color other than the white fallback
    pub fn has_colors(&self) -> bool {
        self.points.iter().any(|v| v.color != PointVertex::WHITE)
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<T> IntoIterator for PointCloud<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T> Extend<T> for PointCloud<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}
