use std::fmt;
use std::ops::{ Index, IndexMut, Mul };

use crate::feq;
use crate::error::{ Error, Result };
use crate::tuple::Tuple;

/// A square matrix of `N` rows and `N` columns.
///
/// Dimensions are part of the type, so multiplying matrices of different
/// sizes is rejected by the compiler rather than at runtime. The 4x4 case
/// (`Matrix4`) encodes every transformation in the ray caster; the 2x2 and 3x3
/// cases exist to compute 4x4 determinants by cofactor expansion.
///
/// Elements are stored in row-major order and addressed with `(row, col)`
/// pairs.
///
/// # Examples
///
/// Creating an identity matrix:
///
/// ```
/// # use raycaster::matrix::Matrix4;
/// let mat = Matrix4::identity();
/// assert_eq!(mat.determinant(), 1.0);
/// ```
///
/// Inverting a transformation:
///
/// ```
/// # use raycaster::matrix::Matrix4;
/// # use raycaster::tuple::Tuple;
/// let m = Matrix4::translation(5.0, -3.0, 2.0);
/// let inv = m.inverse().unwrap();
/// let p = Tuple::point(-3.0, 4.0, 5.0);
/// assert_eq!(inv * p, Tuple::point(-8.0, 7.0, 3.0));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Matrix<const N: usize> {
    data: [[f64; N]; N],
}

pub type Matrix2 = Matrix<2>;
pub type Matrix3 = Matrix<3>;
pub type Matrix4 = Matrix<4>;

impl<const N: usize> Matrix<N> {
    /// Creates a matrix with every element set to `0.0`.
    pub fn zero() -> Matrix<N> {
        Matrix { data: [[0.0; N]; N] }
    }

    pub fn identity() -> Matrix<N> {
        let mut m = Self::zero();
        for i in 0..N {
            m.data[i][i] = 1.0;
        }

        m
    }

    /// The number of rows (and columns) of the matrix.
    pub fn size(&self) -> usize {
        N
    }

    /// Produces the transpose of a matrix, swapping rows with columns.
    pub fn transpose(&self) -> Matrix<N> {
        let mut t = Self::zero();
        for r in 0..N {
            for c in 0..N {
                t.data[c][r] = self.data[r][c];
            }
        }

        t
    }
}

impl<const N: usize> Default for Matrix<N> {
    fn default() -> Matrix<N> {
        Self::identity()
    }
}

impl<const N: usize> From<[[f64; N]; N]> for Matrix<N> {
    fn from(data: [[f64; N]; N]) -> Matrix<N> {
        Matrix { data }
    }
}

impl<const N: usize> Index<(usize, usize)> for Matrix<N> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[index.0][index.1]
    }
}

impl<const N: usize> IndexMut<(usize, usize)> for Matrix<N> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[index.0][index.1]
    }
}

/// Matrices are compared element-wise, with approximate float equality.
impl<const N: usize> PartialEq for Matrix<N> {
    fn eq(&self, other: &Matrix<N>) -> bool {
        self.data.iter().flatten()
            .zip(other.data.iter().flatten())
            .all(|(x, y)| feq(*x, *y))
    }
}

impl Matrix2 {
    pub fn determinant(&self) -> f64 {
        self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]
    }
}

/// Submatrices, minors, cofactors, determinants and inverses for an `$n`x`$n`
/// matrix whose submatrices are `$m`x`$m`.
macro_rules! cofactor_expansion {
    ($n:literal, $m:literal) => {
        impl Matrix<$n> {
            /// Returns a copy of the matrix with `row` and `col` removed.
            pub fn submatrix(&self, row: usize, col: usize) -> Matrix<$m> {
                let mut sub = Matrix::<$m>::zero();
                let rows = (0..$n).filter(|&r| r != row);

                for (sr, r) in rows.enumerate() {
                    let cols = (0..$n).filter(|&c| c != col);
                    for (sc, c) in cols.enumerate() {
                        sub.data[sr][sc] = self.data[r][c];
                    }
                }

                sub
            }

            /// The determinant of the submatrix at `row` and `col`.
            pub fn minor(&self, row: usize, col: usize) -> f64 {
                self.submatrix(row, col).determinant()
            }

            /// The minor at `row` and `col`, negated when `row + col` is odd.
            pub fn cofactor(&self, row: usize, col: usize) -> f64 {
                let m = self.minor(row, col);
                if (row + col) % 2 == 0 { m } else { -m }
            }

            /// Expands cofactors along the first row.
            pub fn determinant(&self) -> f64 {
                (0..$n).map(|c| self.data[0][c] * self.cofactor(0, c)).sum()
            }

            pub fn is_invertible(&self) -> bool {
                self.determinant() != 0.0
            }

            /// Calculates the inverse of the matrix.
            ///
            /// Fails with `Error::NotInvertible` when the determinant is zero.
            pub fn inverse(&self) -> Result<Matrix<$n>> {
                let det = self.determinant();
                if det == 0.0 {
                    return Err(Error::NotInvertible);
                }

                let mut inv = Self::zero();
                for r in 0..$n {
                    for c in 0..$n {
                        inv.data[c][r] = self.cofactor(r, c) / det;
                    }
                }

                Ok(inv)
            }
        }
    };
}

cofactor_expansion!(3, 2);
cofactor_expansion!(4, 3);

impl Matrix4 {
    /// Offsets a point by `x`, `y` and `z`. Vectors are unaffected.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4 {
        let mut trans = Self::identity();
        trans[(0, 3)] = x;
        trans[(1, 3)] = y;
        trans[(2, 3)] = z;

        trans
    }

    /// Scales points and vectors along the X, Y and Z axes.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4 {
        let mut scale = Self::identity();
        scale[(0, 0)] = x;
        scale[(1, 1)] = y;
        scale[(2, 2)] = z;

        scale
    }

    /// Rotates about the X axis by `r` radians.
    ///
    /// ```
    /// # use raycaster::tuple::Tuple;
    /// # use raycaster::matrix::Matrix4;
    /// let point = Tuple::point(0.0, 1.0, 0.0);
    /// let m = Matrix4::rotation_x(std::f64::consts::PI / 2.0);
    /// assert_eq!(m * point, Tuple::point(0.0, 0.0, 1.0));
    /// ```
    pub fn rotation_x(r: f64) -> Matrix4 {
        let mut rotate = Self::identity();
        rotate[(1, 1)] =  r.cos();
        rotate[(1, 2)] = -r.sin();
        rotate[(2, 1)] =  r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Rotates about the Y axis by `r` radians.
    pub fn rotation_y(r: f64) -> Matrix4 {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 2)] =  r.sin();
        rotate[(2, 0)] = -r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Rotates about the Z axis by `r` radians.
    pub fn rotation_z(r: f64) -> Matrix4 {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 1)] = -r.sin();
        rotate[(1, 0)] =  r.sin();
        rotate[(1, 1)] =  r.cos();

        rotate
    }

    /// Shears each axis in proportion to the other two.
    ///
    /// `xy` is the change in `x` in proportion to `y`, and so on.
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64)
        -> Matrix4 {
        let mut shear = Self::identity();
        shear[(0, 1)] = xy;
        shear[(0, 2)] = xz;
        shear[(1, 0)] = yx;
        shear[(1, 2)] = yz;
        shear[(2, 0)] = zx;
        shear[(2, 1)] = zy;

        shear
    }

    /// Generates a view transformation.
    ///
    /// `from` is where the eye is, `to` is where the eye is looking, and `up`
    /// is roughly which way is up. The result moves the *world* relative to
    /// the eye.
    pub fn view_transform(from: Tuple, to: Tuple, up: Tuple) -> Matrix4 {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize());
        let true_up = left.cross(&forward);

        let orientation: Matrix4 = [
            [     left.x,     left.y,     left.z, 0.0],
            [  true_up.x,  true_up.y,  true_up.z, 0.0],
            [ -forward.x, -forward.y, -forward.z, 0.0],
            [        0.0,        0.0,        0.0, 1.0],
        ].into();

        orientation * Matrix4::translation(-from.x, -from.y, -from.z)
    }
}

impl<const N: usize> Mul for Matrix<N> {
    type Output = Matrix<N>;

    fn mul(self, other: Matrix<N>) -> Matrix<N> {
        let mut product = Matrix::zero();
        for r in 0..N {
            for c in 0..N {
                product.data[r][c] = (0..N)
                    .map(|i| self.data[r][i] * other.data[i][c])
                    .sum();
            }
        }

        product
    }
}

impl Mul<Tuple> for Matrix4 {
    type Output = Tuple;

    fn mul(self, other: Tuple) -> Tuple {
        let t = [other.x, other.y, other.z, other.w];
        let row = |r: usize| (0..4).map(|c| self.data[r][c] * t[c]).sum();

        Tuple::new(row(0), row(1), row(2), row(3))
    }
}

impl<const N: usize> fmt::Display for Matrix<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.data.iter().enumerate() {
            write!(f, "|")?;
            for x in row.iter() {
                write!(f, " {} |", x)?;
            }

            // No newline after the final row
            if r != N - 1 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[test]
fn identity() {
    let a: Matrix4 = [
        [0.0, 1.0,  2.0,  4.0],
        [1.0, 2.0,  4.0,  8.0],
        [2.0, 4.0,  8.0, 16.0],
        [4.0, 8.0, 16.0, 32.0],
    ].into();

    assert_eq!(a * Matrix4::identity(), a);
    assert_eq!(Matrix4::identity() * Tuple::new(1.0, 2.0, 3.0, 4.0),
        Tuple::new(1.0, 2.0, 3.0, 4.0));
    assert_eq!(Matrix4::identity().size(), 4);
}

#[test]
fn multiply() {
    let a: Matrix4 = [
        [1.0, 2.0, 3.0, 4.0],
        [5.0, 6.0, 7.0, 8.0],
        [9.0, 8.0, 7.0, 6.0],
        [5.0, 4.0, 3.0, 2.0],
    ].into();
    let b: Matrix4 = [
        [-2.0, 1.0, 2.0,  3.0],
        [ 3.0, 2.0, 1.0, -1.0],
        [ 4.0, 3.0, 6.0,  5.0],
        [ 1.0, 2.0, 7.0,  8.0],
    ].into();
    let ab: Matrix4 = [
        [20.0, 22.0,  50.0,  48.0],
        [44.0, 54.0, 114.0, 108.0],
        [40.0, 58.0, 110.0, 102.0],
        [16.0, 26.0,  46.0,  42.0],
    ].into();

    assert_eq!(a * b, ab);
}

#[test]
fn multiply_tuple() {
    let a: Matrix4 = [
        [1.0, 2.0, 3.0, 4.0],
        [2.0, 4.0, 4.0, 2.0],
        [8.0, 6.0, 4.0, 1.0],
        [0.0, 0.0, 0.0, 1.0],
    ].into();

    assert_eq!(a * Tuple::point(1.0, 2.0, 3.0), Tuple::point(18.0, 24.0, 33.0));
}

#[test]
fn transpose() {
    let a: Matrix4 = [
        [0.0, 9.0, 3.0, 0.0],
        [9.0, 8.0, 0.0, 8.0],
        [1.0, 8.0, 5.0, 3.0],
        [0.0, 0.0, 5.0, 8.0],
    ].into();
    let t: Matrix4 = [
        [0.0, 9.0, 1.0, 0.0],
        [9.0, 8.0, 8.0, 0.0],
        [3.0, 0.0, 5.0, 5.0],
        [0.0, 8.0, 3.0, 8.0],
    ].into();

    assert_eq!(a.transpose(), t);
    assert_eq!(Matrix4::identity().transpose(), Matrix4::identity());
}

#[test]
fn mat2_determinant() {
    let a: Matrix2 = [[1.0, 5.0], [-3.0, 2.0]].into();
    assert_eq!(a.determinant(), 17.0);
}

#[test]
fn submatrices() {
    let a: Matrix3 = [
        [ 1.0, 5.0,  0.0],
        [-3.0, 2.0,  7.0],
        [ 0.0, 6.0, -3.0],
    ].into();
    let s: Matrix2 = [[-3.0, 2.0], [0.0, 6.0]].into();
    assert_eq!(a.submatrix(0, 2), s);

    let b: Matrix4 = [
        [-6.0, 1.0,  1.0, 6.0],
        [-8.0, 5.0,  8.0, 6.0],
        [-1.0, 0.0,  8.0, 2.0],
        [-7.0, 1.0, -1.0, 1.0],
    ].into();
    let s: Matrix3 = [
        [-6.0,  1.0, 6.0],
        [-8.0,  8.0, 6.0],
        [-7.0, -1.0, 1.0],
    ].into();
    assert_eq!(b.submatrix(2, 1), s);
}

#[test]
fn mat3_minor_and_cofactor() {
    let a: Matrix3 = [
        [3.0,  5.0,  0.0],
        [2.0, -1.0, -7.0],
        [6.0, -1.0,  5.0],
    ].into();

    assert_eq!(a.minor(0, 0), -12.0);
    assert_eq!(a.cofactor(0, 0), -12.0);
    assert_eq!(a.minor(1, 0), 25.0);
    assert_eq!(a.cofactor(1, 0), -25.0);
}

#[test]
fn determinants() {
    let a: Matrix3 = [
        [ 1.0, 2.0,  6.0],
        [-5.0, 8.0, -4.0],
        [ 2.0, 6.0,  4.0],
    ].into();
    assert_eq!(a.cofactor(0, 0), 56.0);
    assert_eq!(a.cofactor(0, 1), 12.0);
    assert_eq!(a.cofactor(0, 2), -46.0);
    assert_eq!(a.determinant(), -196.0);

    let b: Matrix4 = [
        [-2.0, -8.0,  3.0,  5.0],
        [-3.0,  1.0,  7.0,  3.0],
        [ 1.0,  2.0, -9.0,  6.0],
        [-6.0,  7.0,  7.0, -9.0],
    ].into();
    assert_eq!(b.cofactor(0, 0), 690.0);
    assert_eq!(b.cofactor(0, 1), 447.0);
    assert_eq!(b.cofactor(0, 2), 210.0);
    assert_eq!(b.cofactor(0, 3), 51.0);
    assert_eq!(b.determinant(), -4071.0);
}

#[test]
fn singular_matrix_is_not_invertible() {
    let a: Matrix4 = [
        [-4.0,  2.0, -2.0, -3.0],
        [ 9.0,  6.0,  2.0,  6.0],
        [ 0.0, -5.0,  1.0, -5.0],
        [ 0.0,  0.0,  0.0,  0.0],
    ].into();

    assert!(!a.is_invertible());
    assert!(matches!(a.inverse(), Err(Error::NotInvertible)));
}

#[test]
fn mat4_inverse() {
    let a: Matrix4 = [
        [ 8.0, -5.0,  9.0,  2.0],
        [ 7.0,  5.0,  6.0,  1.0],
        [-6.0,  0.0,  9.0,  6.0],
        [-3.0,  0.0, -9.0, -4.0],
    ].into();
    let inv: Matrix4 = [
        [-0.15385, -0.15385, -0.28205, -0.53846],
        [-0.07692,  0.12308,  0.02564,  0.03077],
        [ 0.35897,  0.35897,  0.43590,  0.92308],
        [-0.69231, -0.69231, -0.76923, -1.92308],
    ].into();
    assert_eq!(a.inverse().unwrap(), inv);

    let b: Matrix4 = [
        [ 9.0,  3.0,  0.0,  9.0],
        [-5.0, -2.0, -6.0, -3.0],
        [-4.0,  9.0,  6.0,  4.0],
        [-7.0,  6.0,  6.0,  2.0],
    ].into();
    let inv: Matrix4 = [
        [-0.04074, -0.07778,  0.14444, -0.22222],
        [-0.07778,  0.03333,  0.36667, -0.33333],
        [-0.02901, -0.14630, -0.10926,  0.12963],
        [ 0.17778,  0.06667, -0.26667,  0.33333],
    ].into();
    assert_eq!(b.inverse().unwrap(), inv);
}

#[test]
fn inverse_round_trips() {
    let a: Matrix4 = [
        [ 3.0, -9.0,  7.0,  3.0],
        [ 3.0, -8.0,  2.0, -9.0],
        [-4.0,  4.0,  4.0,  1.0],
        [-6.0,  5.0, -1.0,  1.0],
    ].into();
    let b: Matrix4 = [
        [ 8.0,  2.0,  2.0,  2.0],
        [ 3.0, -1.0,  7.0,  0.0],
        [ 7.0,  0.0,  5.0,  4.0],
        [ 6.0, -2.0,  0.0,  5.0],
    ].into();

    assert_eq!(a.inverse().unwrap().inverse().unwrap(), a);
    assert_eq!((a * b) * b.inverse().unwrap(), a);
    assert_eq!(a * a.inverse().unwrap(), Matrix4::identity());
}

#[test]
fn translation() {
    let m = Matrix4::translation(5.0, -3.0, 2.0);
    let p = Tuple::point(-3.0, 4.0, 5.0);
    let v = Tuple::vector(-3.0, 4.0, 5.0);

    assert_eq!(m * p, Tuple::point(2.0, 1.0, 7.0));
    assert_eq!(m.inverse().unwrap() * p, Tuple::point(-8.0, 7.0, 3.0));
    assert_eq!(m * v, v);
}

#[test]
fn scaling() {
    let m = Matrix4::scaling(2.0, 3.0, 4.0);

    assert_eq!(m * Tuple::point(-4.0, 6.0, 8.0), Tuple::point(-8.0, 18.0, 32.0));
    assert_eq!(m * Tuple::vector(-4.0, 6.0, 8.0), Tuple::vector(-8.0, 18.0, 32.0));
    assert_eq!(m.inverse().unwrap() * Tuple::vector(-4.0, 6.0, 8.0),
        Tuple::vector(-2.0, 2.0, 2.0));
    assert_eq!(Matrix4::scaling(-1.0, 1.0, 1.0) * Tuple::point(2.0, 3.0, 4.0),
        Tuple::point(-2.0, 3.0, 4.0));
}

#[test]
fn rotations() {
    use std::f64::consts::PI;
    let h = f64::sqrt(2.0) / 2.0;

    let p = Tuple::point(0.0, 1.0, 0.0);
    assert_eq!(Matrix4::rotation_x(PI / 4.0) * p, Tuple::point(0.0, h, h));
    assert_eq!(Matrix4::rotation_x(PI / 4.0).inverse().unwrap() * p,
        Tuple::point(0.0, h, -h));

    let p = Tuple::point(0.0, 0.0, 1.0);
    assert_eq!(Matrix4::rotation_y(PI / 4.0) * p, Tuple::point(h, 0.0, h));
    assert_eq!(Matrix4::rotation_y(PI / 2.0) * p, Tuple::point(1.0, 0.0, 0.0));

    let p = Tuple::point(0.0, 1.0, 0.0);
    assert_eq!(Matrix4::rotation_z(PI / 4.0) * p, Tuple::point(-h, h, 0.0));
    assert_eq!(Matrix4::rotation_z(PI / 2.0) * p, Tuple::point(-1.0, 0.0, 0.0));
}

#[test]
fn shearing() {
    let p = Tuple::point(2.0, 3.0, 4.0);

    assert_eq!(Matrix4::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0) * p,
        Tuple::point(5.0, 3.0, 4.0));
    assert_eq!(Matrix4::shearing(0.0, 1.0, 0.0, 0.0, 0.0, 0.0) * p,
        Tuple::point(6.0, 3.0, 4.0));
    assert_eq!(Matrix4::shearing(0.0, 0.0, 1.0, 0.0, 0.0, 0.0) * p,
        Tuple::point(2.0, 5.0, 4.0));
    assert_eq!(Matrix4::shearing(0.0, 0.0, 0.0, 1.0, 0.0, 0.0) * p,
        Tuple::point(2.0, 7.0, 4.0));
    assert_eq!(Matrix4::shearing(0.0, 0.0, 0.0, 0.0, 1.0, 0.0) * p,
        Tuple::point(2.0, 3.0, 6.0));
    assert_eq!(Matrix4::shearing(0.0, 0.0, 0.0, 0.0, 0.0, 1.0) * p,
        Tuple::point(2.0, 3.0, 7.0));
}

#[test]
fn chained_transforms() {
    use std::f64::consts::PI;

    let p = Tuple::point(1.0, 0.0, 1.0);
    let a = Matrix4::rotation_x(PI / 2.0);
    let b = Matrix4::scaling(5.0, 5.0, 5.0);
    let c = Matrix4::translation(10.0, 5.0, 7.0);

    // Applied in reverse order of multiplication
    assert_eq!(c * b * a * p, Tuple::point(15.0, 0.0, 7.0));
}

#[test]
fn default_view() {
    let from = Tuple::point(0.0, 0.0, 0.0);
    let to = Tuple::point(0.0, 0.0, -1.0);
    let up = Tuple::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4::view_transform(from, to, up), Matrix4::identity());
}

#[test]
fn positive_z_view() {
    let from = Tuple::point(0.0, 0.0, 0.0);
    let to = Tuple::point(0.0, 0.0, 1.0);
    let up = Tuple::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4::view_transform(from, to, up),
        Matrix4::scaling(-1.0, 1.0, -1.0));
}

#[test]
fn view_moves_world() {
    let from = Tuple::point(0.0, 0.0, 8.0);
    let to = Tuple::point(0.0, 0.0, 0.0);
    let up = Tuple::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4::view_transform(from, to, up),
        Matrix4::translation(0.0, 0.0, -8.0));
}

#[test]
fn arbitrary_view() {
    let from = Tuple::point(1.0, 3.0, 2.0);
    let to = Tuple::point(4.0, -2.0, 8.0);
    let up = Tuple::vector(1.0, 1.0, 0.0);

    let a: Matrix4 = [
        [-0.50709, 0.50709,  0.67612, -2.36643],
        [ 0.76772, 0.60609,  0.12122, -2.82843],
        [-0.35857, 0.59761, -0.71714,  0.00000],
        [ 0.00000, 0.00000,  0.00000,  1.00000],
    ].into();

    assert_eq!(Matrix4::view_transform(from, to, up), a);
}
