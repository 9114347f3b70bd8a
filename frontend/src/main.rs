//! Entry point for the WASM application

pub fn main() {
    dollar_qr::run()
}
