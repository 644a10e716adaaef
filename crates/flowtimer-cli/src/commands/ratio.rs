use flowtimer_core::target_ratio;

pub fn run(work: u32, break_minutes: u32) -> Result<(), Box<dyn std::error::Error>> {
    if break_minutes == 0 {
        return Err("break minutes must be at least 1".into());
    }
    println!("{}:1", target_ratio(work, break_minutes));
    Ok(())
}
