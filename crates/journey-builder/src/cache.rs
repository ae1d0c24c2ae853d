use crate::graph_view::{PreviewGraph, build_preview_graph};
use crate::store::Store;
use crate::versioned::Memoized;
use journey::{Canvas, DanglingReference, Scene, duplicate_property_keys, find_dangling_references};

pub struct Cache {
    pub scene: Memoized<Store, (u64, Canvas), Scene>,
    pub preview_graph: Memoized<Store, (u64, Canvas), PreviewGraph>,
    pub dangling: Memoized<Store, u64, Vec<DanglingReference>>,
    pub duplicate_keys: Memoized<Store, u64, Vec<(String, usize)>>,
}

impl Cache {
    pub fn new() -> Self {
        let scene = Memoized::new(
            |s: &Store| (s.journey.version(), s.settings.canvas()),
            |s: &Store| Scene::build(s.current(), s.settings.canvas()),
        );

        let preview_graph = Memoized::new(
            |s: &Store| (s.journey.version(), s.settings.canvas()),
            |s: &Store| build_preview_graph(&Scene::build(s.current(), s.settings.canvas())),
        );

        let dangling = Memoized::new(
            |s: &Store| s.journey.version(),
            |s: &Store| find_dangling_references(s.current()),
        );

        let duplicate_keys = Memoized::new(
            |s: &Store| s.journey.version(),
            |s: &Store| duplicate_property_keys(s.current()),
        );

        Self {
            scene,
            preview_graph,
            dangling,
            duplicate_keys,
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}
