#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    journey_builder::native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build starts through the library's start() function.
}
