use std::ops::Range;

use log::{ debug, trace };

use crate::error::{ Error, Result };
use crate::config::RenderConfig;
use crate::ray::Ray;
use crate::tuple::Tuple;
use crate::matrix::Matrix4;
use crate::world::World;
use crate::canvas::Canvas;

/// A camera record for generating a canvas.
///
/// This record gives a "frame" of the world. Based on camera parameters,
/// different perspectives can be produced. The canvas sits one unit in front
/// of the camera, and the camera transform (typically a view transformation)
/// orients the world relative to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    hsize: usize,
    vsize: usize,
    field_of_view: f64,

    half_width: f64,
    half_height: f64,
    pixel_size: f64,

    transform: Matrix4,
    inverse: Matrix4,
}

impl Camera {
    /// Creates a camera with an identity transform.
    ///
    /// `field_of_view` is the angle, in radians, describing "how much" the
    /// camera can see.
    ///
    /// # Examples
    ///
    /// ```
    /// # use raycaster::camera::Camera;
    /// let c = Camera::new(200, 125, std::f64::consts::PI / 2.0);
    /// assert!((c.pixel_size() - 0.01).abs() < 0.0001);
    /// ```
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64) -> Camera {
        let half_view = (field_of_view / 2.0).tan();
        let aspect = (hsize as f64) / (vsize as f64);

        let half_width: f64;
        let half_height: f64;

        if aspect >= 1.0 {
            half_width = half_view;
            half_height = half_view / aspect;
        } else {
            half_width = half_view * aspect;
            half_height = half_view;
        }

        let pixel_size = half_width * 2.0 / (hsize as f64);
        Camera {
            hsize,
            vsize,
            field_of_view,
            half_width,
            half_height,
            pixel_size,
            transform: Matrix4::identity(),
            inverse: Matrix4::identity(),
        }
    }

    pub fn hsize(&self) -> usize {
        self.hsize
    }

    pub fn vsize(&self) -> usize {
        self.vsize
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    /// The size of a single pixel in world space, on the canvas one unit in
    /// front of the camera.
    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    /// Sets the camera transform, caching its inverse.
    ///
    /// Fails with `Error::NotInvertible` if the transform is singular; the
    /// camera is left untouched in that case.
    pub fn set_transform(&mut self, transform: Matrix4) -> Result<()> {
        self.inverse = transform.inverse()?;
        self.transform = transform;

        Ok(())
    }

    /// Builder form of `set_transform`.
    pub fn with_transform(mut self, transform: Matrix4) -> Result<Camera> {
        self.set_transform(transform)?;
        Ok(self)
    }

    /// Produces a ray from the camera through the center of pixel
    /// `(px, py)`.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        // Offsets from the edge of the canvas to the pixel's center
        let xoffset = (px as f64 + 0.5) * self.pixel_size;
        let yoffset = (py as f64 + 0.5) * self.pixel_size;

        // The untransformed coordinates of the pixel in world space
        let world_x = self.half_width - xoffset;
        let world_y = self.half_height - yoffset;

        let pixel = self.inverse * Tuple::point(world_x, world_y, -1.0);
        let origin = self.inverse * Tuple::point(0.0, 0.0, 0.0);
        let direction = (pixel - origin).normalize();

        Ray::new(origin, direction)
    }

    /// Renders the world onto a new canvas, one ray per pixel.
    pub fn render(&self, w: &World, config: &RenderConfig) -> Result<Canvas> {
        debug!("rendering {}x{} image (depth {}, epsilon {})",
            self.hsize, self.vsize, config.recursion_depth, config.epsilon);

        let mut image = Canvas::new(self.hsize, self.vsize);

        for y in 0..self.vsize {
            trace!("rendering row {}", y);

            for x in 0..self.hsize {
                let ray = self.ray_for_pixel(x, y);
                let color = w.color_at(&ray, config.recursion_depth, config)?;
                image.write_pixel(x, y, color);
            }
        }

        debug!("finished rendering {}x{} image", self.hsize, self.vsize);
        Ok(image)
    }

    /// Renders a rectangular sector of the image into a flat RGBA buffer.
    ///
    /// Pixel `(x, y)` is written at byte `4 * (vsize * y + x)` with alpha
    /// 255. Disjoint sectors touch disjoint bytes, so a driver can spread them
    /// over several frames. A write that falls outside `buffer` fails with
    /// `Error::PixelOutOfBounds`.
    pub fn render_sector(&self, w: &World, buffer: &mut [u8],
        xs: Range<usize>, ys: Range<usize>, config: &RenderConfig)
        -> Result<()> {
        trace!("rendering sector x {:?}, y {:?}", xs, ys);

        for y in ys {
            for x in xs.clone() {
                let index = 4 * (self.vsize * y + x);
                let len = buffer.len();
                let pixel = buffer.get_mut(index..index + 4)
                    .ok_or(Error::PixelOutOfBounds { x, y, len })?;

                let ray = self.ray_for_pixel(x, y);
                let color = w.color_at(&ray, config.recursion_depth, config)?;
                pixel.copy_from_slice(&color.to_rgba8());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
fn default_view() -> Matrix4 {
    Matrix4::view_transform(
        Tuple::point(0.0, 0.0, -5.0),
        Tuple::point(0.0, 0.0, 0.0),
        Tuple::vector(0.0, 1.0, 0.0),
    )
}

#[test]
fn construct_camera() {
    let c = Camera::new(160, 120, std::f64::consts::PI / 2.0);

    assert_eq!(c.hsize(), 160);
    assert_eq!(c.vsize(), 120);
    assert_eq!(c.field_of_view(), std::f64::consts::PI / 2.0);
    assert_eq!(*c.transform(), Matrix4::identity());
}

#[test]
fn pixel_size_horizontal_canvas() {
    let c = Camera::new(200, 125, std::f64::consts::PI / 2.0);
    assert!(crate::feq(c.pixel_size(), 0.01));
}

#[test]
fn pixel_size_vertical_canvas() {
    let c = Camera::new(125, 200, std::f64::consts::PI / 2.0);
    assert!(crate::feq(c.pixel_size(), 0.01));
}

#[test]
fn ray_through_center() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0);
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin(), Tuple::point(0.0, 0.0, 0.0));
    assert_eq!(r.direction(), Tuple::vector(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0);
    let r = c.ray_for_pixel(0, 0);

    assert_eq!(r.origin(), Tuple::point(0.0, 0.0, 0.0));
    assert_eq!(r.direction(), Tuple::vector(0.66519, 0.33259, -0.66851));
}

#[test]
fn ray_when_camera_transformed() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0)
        .with_transform(Matrix4::rotation_y(std::f64::consts::PI / 4.0)
            * Matrix4::translation(0.0, -2.0, 5.0))
        .unwrap();
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin(), Tuple::point(0.0, 2.0, -5.0));
    assert_eq!(r.direction(),
        Tuple::vector(2.0f64.sqrt() / 2.0, 0.0, -(2.0f64.sqrt() / 2.0)));
}

#[test]
fn singular_camera_transform_rejected() {
    let mut c = Camera::new(11, 11, std::f64::consts::PI / 2.0);
    let result = c.set_transform(Matrix4::scaling(0.0, 1.0, 1.0));

    assert!(matches!(result, Err(Error::NotInvertible)));
    assert_eq!(*c.transform(), Matrix4::identity());
}

#[test]
fn render_world_with_camera() {
    use crate::color::Color;

    let w: World = Default::default();
    let c = Camera::new(11, 11, std::f64::consts::PI / 2.0)
        .with_transform(default_view())
        .unwrap();

    let image = c.render(&w, &RenderConfig::default()).unwrap();
    assert_eq!(image.width, 11);
    assert_eq!(image.height, 11);
    assert_eq!(image.read_pixel(5, 5).unwrap(),
        Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn render_without_light_fails() {
    let mut w: World = Default::default();
    w.light_source = None;
    let c = Camera::new(11, 11, std::f64::consts::PI / 2.0)
        .with_transform(default_view())
        .unwrap();

    assert!(matches!(c.render(&w, &RenderConfig::default()),
        Err(Error::MissingLightSource)));
}

#[test]
fn render_sector_writes_rgba() {
    let w: World = Default::default();
    let c = Camera::new(11, 11, std::f64::consts::PI / 2.0)
        .with_transform(default_view())
        .unwrap();
    let mut buffer = vec![0u8; 4 * 11 * 11];

    c.render_sector(&w, &mut buffer, 5..6, 5..6, &RenderConfig::default())
        .unwrap();

    let index = 4 * (11 * 5 + 5);
    assert_eq!(&buffer[index..index + 4], &[97, 121, 73, 255]);

    // Nothing outside the sector is touched
    assert!(buffer[..index].iter().all(|&b| b == 0));
    assert!(buffer[index + 4..].iter().all(|&b| b == 0));
}

#[test]
fn render_sector_out_of_bounds() {
    let w: World = Default::default();
    let c = Camera::new(11, 11, std::f64::consts::PI / 2.0)
        .with_transform(default_view())
        .unwrap();
    let mut buffer = vec![0u8; 4 * 4];

    let result = c.render_sector(&w, &mut buffer, 0..11, 0..11,
        &RenderConfig::default());
    assert!(matches!(result, Err(Error::PixelOutOfBounds { x: 4, y: 0, len: 16 })));
}
