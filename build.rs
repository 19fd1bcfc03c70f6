use shadow_rs::ShadowBuilder;

fn main() {
    // Embed git/build metadata for `roster-rs --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
