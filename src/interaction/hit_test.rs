use std::time::{Duration, Instant};

use cgmath::Vector2;

use crate::gfx::{
    camera::Camera,
    picking::{Intersection, Raycaster},
    scene::{NodeId, SceneGraph},
};

use super::{config::DEFAULT_RECT_CACHE_TTL, surface::Surface, surface::SurfaceRect};

/// Outcome of one hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    /// Pointer position in surface backing pixels
    pub x: f32,
    pub y: f32,
    /// Nearest first, with the whole-scene hit (if any) last
    pub intersections: Vec<Intersection>,
}

#[derive(Debug, Clone, Copy)]
struct CachedRect {
    rect: SurfaceRect,
    backing: (f32, f32),
    /// Backing pixels per displayed unit
    scale: (f32, f32),
    expires_at: Instant,
}

/// Turns client coordinates into ordered scene hits.
///
/// Reading the surface rectangle can be costly on some hosts, so it is cached
/// for `ttl`.
#[derive(Debug)]
pub struct HitTester {
    raycaster: Raycaster,
    cached: Option<CachedRect>,
    ttl: Duration,
}

impl HitTester {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_RECT_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            raycaster: Raycaster::new(),
            cached: None,
            ttl,
        }
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
        self.invalidate();
    }

    /// Forces the next hit test to re-read the surface rectangle.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn raycaster(&self) -> &Raycaster {
        &self.raycaster
    }

    fn rect(&mut self, surface: &dyn Surface, now: Instant) -> CachedRect {
        if let Some(cached) = self.cached.filter(|cached| now < cached.expires_at) {
            return cached;
        }

        let rect = surface.bounding_rect();
        let (backing_w, backing_h) = surface.backing_size();
        let backing = (backing_w as f32, backing_h as f32);
        let scale_axis = |backing: f32, displayed: f32| {
            if backing > 0.0 && displayed > 0.0 {
                backing / displayed
            } else {
                1.0
            }
        };

        let cached = CachedRect {
            rect,
            backing,
            scale: (
                scale_axis(backing.0, rect.width),
                scale_axis(backing.1, rect.height),
            ),
            expires_at: now + self.ttl,
        };
        log::trace!("surface rect refreshed: {:?}", cached.rect);
        self.cached = Some(cached);
        cached
    }

    /// Projects `client` through `camera` and intersects the resulting ray
    /// with `candidates`.
    ///
    /// When `scene_root` is set a synthetic whole-scene hit is appended after
    /// the real ones.
    pub fn intersect(
        &mut self,
        scene: &SceneGraph,
        surface: &dyn Surface,
        camera: &dyn Camera,
        client: (f32, f32),
        candidates: &[NodeId],
        scene_root: Option<NodeId>,
    ) -> PickResult {
        let cached = self.rect(surface, Instant::now());

        let x = (client.0 - cached.rect.left) * cached.scale.0;
        let y = (client.1 - cached.rect.top) * cached.scale.1;

        let extent = |backing: f32, displayed: f32| if backing > 0.0 { backing } else { displayed };
        let width = extent(cached.backing.0, cached.rect.width);
        let height = extent(cached.backing.1, cached.rect.height);

        let mut intersections = Vec::new();
        if width > 0.0 && height > 0.0 {
            let ndc = Vector2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0);
            if self.raycaster.set_from_camera(ndc, camera) {
                intersections = self.raycaster.intersect_objects(scene, candidates);
            } else {
                log::debug!("camera could not unproject {:?}, no hits", ndc);
            }
        }

        if let Some(root) = scene_root {
            intersections.push(Intersection::scene(root));
        }

        PickResult {
            x,
            y,
            intersections,
        }
    }
}

impl Default for HitTester {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{camera::OrbitCamera, picking::AABB, scene::Node};
    use crate::interaction::surface::StaticSurface;
    use cgmath::{Vector3, Zero};
    use std::cell::Cell;

    struct CountingSurface {
        inner: StaticSurface,
        reads: Cell<usize>,
    }

    impl Surface for CountingSurface {
        fn bounding_rect(&self) -> SurfaceRect {
            self.reads.set(self.reads.get() + 1);
            self.inner.bounding_rect()
        }

        fn backing_size(&self) -> (u32, u32) {
            self.inner.backing_size()
        }
    }

    fn camera() -> OrbitCamera {
        OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0)
    }

    #[test]
    fn test_center_click_hits_cube() {
        let mut scene = SceneGraph::new();
        let cube = scene.insert(Node::object("cube").with_bounds(AABB::unit()), None);
        let surface = StaticSurface::new(100, 100);

        let mut tester = HitTester::new();
        let result = tester.intersect(&scene, &surface, &camera(), (50.0, 50.0), &[cube], None);
        assert_eq!(result.intersections.len(), 1);
        assert_eq!(result.intersections[0].object, cube);
        assert_eq!((result.x, result.y), (50.0, 50.0));
    }

    #[test]
    fn test_corner_misses_and_scene_hit_is_appended() {
        let mut scene = SceneGraph::new();
        let root = scene.insert(Node::scene("root"), None);
        let cube = scene.insert(Node::object("cube").with_bounds(AABB::unit()), Some(root));
        let surface = StaticSurface::new(100, 100);

        let mut tester = HitTester::new();
        let result = tester.intersect(&scene, &surface, &camera(), (5.0, 5.0), &[cube], Some(root));
        assert_eq!(result.intersections, vec![Intersection::scene(root)]);
    }

    #[test]
    fn test_backing_resolution_scales_pointer() {
        let scene = SceneGraph::new();
        // Displayed at 100x100 logical units, offset by (10, 20), backed by 200x200 pixels
        let surface = StaticSurface {
            rect: SurfaceRect::new(10.0, 20.0, 100.0, 100.0),
            backing: (200, 200),
        };

        let mut tester = HitTester::new();
        let result = tester.intersect(&scene, &surface, &camera(), (60.0, 70.0), &[], None);
        assert_eq!((result.x, result.y), (100.0, 100.0));
    }

    #[test]
    fn test_rect_is_cached_until_invalidated() {
        let scene = SceneGraph::new();
        let surface = CountingSurface {
            inner: StaticSurface::new(100, 100),
            reads: Cell::new(0),
        };

        let mut tester = HitTester::with_ttl(Duration::from_secs(60));
        for _ in 0..3 {
            tester.intersect(&scene, &surface, &camera(), (1.0, 1.0), &[], None);
        }
        assert_eq!(surface.reads.get(), 1);

        tester.invalidate();
        tester.intersect(&scene, &surface, &camera(), (1.0, 1.0), &[], None);
        assert_eq!(surface.reads.get(), 2);
    }

    #[test]
    fn test_zero_ttl_reads_every_time() {
        let scene = SceneGraph::new();
        let surface = CountingSurface {
            inner: StaticSurface::new(100, 100),
            reads: Cell::new(0),
        };

        let mut tester = HitTester::with_ttl(Duration::ZERO);
        tester.intersect(&scene, &surface, &camera(), (1.0, 1.0), &[], None);
        tester.intersect(&scene, &surface, &camera(), (1.0, 1.0), &[], None);
        assert_eq!(surface.reads.get(), 2);
    }
}
