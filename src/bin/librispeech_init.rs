use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    librispeech_index::app::run_initialize(std::env::args().skip(1))
}
