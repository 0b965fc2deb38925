//! Projection-only camera. The view matrix comes from a paired transform.

use cgmath::{Deg, Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

use super::camera_utils::OPENGL_TO_WGPU_MATRIX;
use crate::gfx::picking::{screen_to_ndc, Ray};

const PERSPECTIVE_NEAR: f32 = 0.1;
const PERSPECTIVE_FAR: f32 = 100.0;
const ORTHO_NEAR: f32 = -1.0;
const ORTHO_FAR: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        fov_degrees: f32,
        aspect: f32,
    },
    /// `fit_viewport` bounds track the viewport in pixels on every resize.
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        fit_viewport: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    projection: Projection,
    near: f32,
    far: f32,
    viewport: Vector2<f32>,
    matrix: Matrix4<f32>,
}

impl Camera {
    pub fn perspective(fov_degrees: f32, aspect: f32) -> Self {
        let mut camera = Self::empty();
        camera.set_perspective(fov_degrees, aspect);
        camera
    }

    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let mut camera = Self::empty();
        camera.set_ortho(left, right, bottom, top);
        camera
    }

    /// Orthographic camera whose units are viewport pixels, origin bottom-left.
    pub fn screen_ortho() -> Self {
        let mut camera = Self::empty();
        camera.set_projection(Projection::Orthographic {
            left: 0.0,
            right: 1.0,
            bottom: 0.0,
            top: 1.0,
            fit_viewport: true,
        });
        camera
    }

    fn empty() -> Self {
        Self {
            projection: Projection::Perspective {
                fov_degrees: 60.0,
                aspect: 1.0,
            },
            near: PERSPECTIVE_NEAR,
            far: PERSPECTIVE_FAR,
            viewport: Vector2::new(1.0, 1.0),
            matrix: Matrix4::identity(),
        }
    }

    pub fn set_perspective(&mut self, fov_degrees: f32, aspect: f32) {
        self.set_projection(Projection::Perspective { fov_degrees, aspect });
    }

    pub fn set_ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        self.set_projection(Projection::Orthographic {
            left,
            right,
            bottom,
            top,
            fit_viewport: false,
        });
    }

    pub fn set_projection(&mut self, projection: Projection) {
        (self.near, self.far) = match projection {
            Projection::Perspective { .. } => (PERSPECTIVE_NEAR, PERSPECTIVE_FAR),
            Projection::Orthographic { .. } => (ORTHO_NEAR, ORTHO_FAR),
        };
        self.projection = projection;
        self.fit_viewport();
        self.rebuild();
    }

    /// Adopts a new viewport size in pixels; the aspect follows it.
    ///
    /// A zero-sized viewport yields a degenerate projection.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vector2::new(width, height);
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            *aspect = width / height;
        }
        self.fit_viewport();
        self.rebuild();
    }

    fn fit_viewport(&mut self) {
        if let Projection::Orthographic {
            right,
            top,
            left,
            bottom,
            fit_viewport: true,
        } = &mut self.projection
        {
            (*left, *bottom) = (0.0, 0.0);
            (*right, *top) = (self.viewport.x, self.viewport.y);
        }
    }

    fn rebuild(&mut self) {
        let gl = match self.projection {
            Projection::Perspective { fov_degrees, aspect } => {
                cgmath::perspective(Deg(fov_degrees), aspect, self.near, self.far)
            }
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                ..
            } => cgmath::ortho(left, right, bottom, top, self.near, self.far),
        };
        self.matrix = OPENGL_TO_WGPU_MATRIX * gl;
    }

    /// View space to wgpu clip space; valid until the next resize or projection change.
    pub fn projection(&self) -> Matrix4<f32> {
        self.matrix
    }

    pub fn projection_kind(&self) -> Projection {
        self.projection
    }

    pub fn viewport_size(&self) -> Vector2<f32> {
        self.viewport
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// World-space ray through pixel `screen_point` (origin top-left, y down).
    ///
    /// The point is unprojected at the near (z = 0) and far (z = 1) planes
    /// through the inverse of `projection · view`.
    pub fn screen_to_world(&self, view: Matrix4<f32>, screen_point: Vector2<f32>) -> Ray {
        let ndc = screen_to_ndc(screen_point, self.viewport);
        let inverse = (self.matrix * view)
            .invert()
            .unwrap_or_else(Matrix4::identity);

        let unproject = |z: f32| {
            let world = inverse * Vector4::new(ndc.x, ndc.y, z, 1.0);
            Vector3::new(world.x / world.w, world.y / world.w, world.z / world.w)
        };

        let near = unproject(0.0);
        let far = unproject(1.0);
        Ray::new(near, far - near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    /// Projects a world point back to pixel coordinates.
    fn to_screen(camera: &Camera, view: Matrix4<f32>, point: Vector3<f32>) -> Vector2<f32> {
        let clip = camera.projection() * view * point.extend(1.0);
        let ndc = Vector2::new(clip.x / clip.w, clip.y / clip.w);
        let size = camera.viewport_size();
        Vector2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y)
    }

    #[test]
    fn center_ray_reprojects_to_screen_center() {
        let mut camera = Camera::perspective(60.0, 1024.0 / 768.0);
        camera.resize(1024.0, 768.0);
        let view = Matrix4::identity();

        let ray = camera.screen_to_world(view, Vector2::new(512.0, 384.0));
        let screen = to_screen(&camera, view, ray.point_at(10.0));

        assert!((screen.x - 512.0).abs() < 1e-4, "x = {}", screen.x);
        assert!((screen.y - 384.0).abs() < 1e-4, "y = {}", screen.y);
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn off_center_rays_reproject() {
        let mut camera = Camera::perspective(60.0, 1.0);
        camera.resize(1024.0, 768.0);
        let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -12.0));

        for pixel in [Vector2::new(100.0, 600.0), Vector2::new(1000.0, 20.0)] {
            let ray = camera.screen_to_world(view, pixel);
            let screen = to_screen(&camera, view, ray.point_at(5.0));
            assert!((screen - pixel).magnitude() < 1e-2, "{pixel:?} -> {screen:?}");
        }
    }

    #[test]
    fn ray_origin_lies_on_the_near_plane() {
        let mut camera = Camera::perspective(60.0, 1.0);
        camera.resize(800.0, 600.0);
        let ray = camera.screen_to_world(Matrix4::identity(), Vector2::new(400.0, 300.0));
        assert!((ray.origin.z + camera.near()).abs() < 1e-5);
    }

    #[test]
    fn resize_recomputes_aspect() {
        let mut camera = Camera::perspective(60.0, 1.0);
        camera.resize(1024.0, 768.0);
        assert_eq!(
            camera.projection_kind(),
            Projection::Perspective {
                fov_degrees: 60.0,
                aspect: 1024.0 / 768.0
            }
        );
        let expected = OPENGL_TO_WGPU_MATRIX
            * cgmath::perspective(Deg(60.0), 1024.0 / 768.0, PERSPECTIVE_NEAR, PERSPECTIVE_FAR);
        assert_eq!(camera.projection(), expected);
    }

    #[test]
    fn screen_ortho_maps_pixels_to_clip_space() {
        let mut camera = Camera::screen_ortho();
        camera.resize(800.0, 600.0);

        let bottom_left = camera.projection() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let top_right = camera.projection() * Vector4::new(800.0, 600.0, 0.0, 1.0);
        assert!((bottom_left.x + 1.0).abs() < 1e-6 && (bottom_left.y + 1.0).abs() < 1e-6);
        assert!((top_right.x - 1.0).abs() < 1e-6 && (top_right.y - 1.0).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&bottom_left.z));
    }

    #[test]
    fn ortho_rays_point_into_the_screen() {
        let mut camera = Camera::screen_ortho();
        camera.resize(800.0, 600.0);

        let ray = camera.screen_to_world(Matrix4::identity(), Vector2::new(0.0, 0.0));
        assert!((ray.origin.x).abs() < 1e-3);
        assert!((ray.origin.y - 600.0).abs() < 1e-3);
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn explicit_ortho_ignores_resize_bounds() {
        let mut camera = Camera::ortho(-2.0, 2.0, -1.0, 1.0);
        camera.resize(640.0, 480.0);
        match camera.projection_kind() {
            Projection::Orthographic { left, right, .. } => assert_eq!((left, right), (-2.0, 2.0)),
            other => panic!("unexpected projection {other:?}"),
        }
    }
}
