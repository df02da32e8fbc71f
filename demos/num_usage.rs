// ============================================================================
// Num Usage Example
// ============================================================================

use ta_num::prelude::*;

fn main() -> Result<(), NumError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Num Example ===\n");

    // Same computation on each backend
    for config in [NumConfig::double_precision(), NumConfig::default()] {
        let factory = create_from_config(&config)?;
        println!("Backend: {:?}", config.backend);

        let closes = ["101.25", "102.5", "99.75", "100.125", "103"];
        let mut sum = factory.zero();
        for close in closes {
            sum = sum.plus(&factory.num_of_str(close)?)?;
        }
        let mean = sum.divided_by(&factory.num_of_i64(closes.len() as i64))?;

        let mut squares = factory.zero();
        for close in closes {
            let deviation = factory.num_of_str(close)?.minus(&mean)?;
            squares = squares.plus(&deviation.pow(2))?;
        }
        let deviation = squares.divided_by(&factory.num_of_i64(closes.len() as i64))?.sqrt();

        println!("  mean:      {}", mean);
        println!("  deviation: {}\n", deviation);
    }

    // High precision square root
    let factory = DecimalNumFactory::get_instance(100)?;
    println!("sqrt(2) to 100 digits:\n  {}\n", factory.two().sqrt());

    // Undefined results flow through arithmetic
    let undefined = factory.one().divided_by(&factory.zero())?;
    let still_undefined = undefined.plus(&factory.one())?;
    println!("1 / 0 + 1 = {}", still_undefined);
    match still_undefined.to_i64() {
        Ok(value) => println!("as i64: {}", value),
        Err(e) => println!("as i64: {}", e),
    }

    // Backends never mix
    let double = DoubleNumFactory::instance().one();
    if let Err(e) = factory.one().plus(&double) {
        println!("{}", e);
    }
    let converted = factory.convert(&double);
    println!("after convert: {}", factory.one().plus(&converted)?);

    println!("\nCached decimal precisions: {:?}", DecimalNumFactory::cached_precisions());

    Ok(())
}
