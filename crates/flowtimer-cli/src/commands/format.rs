use flowtimer_core::format_time_input;

pub fn run(seconds: &str, signed: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_time_input(seconds, signed));
    Ok(())
}
