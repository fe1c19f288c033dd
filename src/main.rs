// This binary crate is intentionally minimal.
// All engine logic lives in the library (src/lib.rs and its modules).
// Run the demos with:
//   cargo run --example xor
//   cargo run --example sine
fn main() {
    println!("filament-nn: a from-scratch graph-based neural network library in Rust.");
    println!("Run `cargo run --example xor` or `cargo run --example sine` to see it train.");
}
