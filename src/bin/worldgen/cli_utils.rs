use ridgeway::config::{BlockedPolicy, RouteTarget};
use ridgeway::errors::{WorldgenError, WorldgenResult};
use std::str::FromStr;

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
) -> WorldgenResult<[T; N]>
where
    T: FromStr + Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).collect();
    if parts.len() != N {
        return Err(WorldgenError::InvalidConfig {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = part
            .trim()
            .parse()
            .map_err(|_| WorldgenError::InvalidConfig {
                reason: format!("Invalid {type_name} value: '{part}'"),
            })?;
    }

    Ok(result)
}

/// Parse steepness thresholds "WALKABLE,CLIMBABLE" in degrees.
/// Order is checked later with the rest of the config.
pub fn parse_thresholds(input: &str) -> WorldgenResult<(f32, f32)> {
    let [walkable, climbable] = parse_delimited::<f32, 2>(input, ',', "thresholds")?;
    Ok((walkable, climbable))
}

/// Parse priorities "BASE,WALK,CLIMB"
pub fn parse_priorities(input: &str) -> WorldgenResult<(u32, u32, u32)> {
    let [base, walk, climb] = parse_delimited::<u32, 3>(input, ',', "priorities")?;
    if base == 0 {
        return Err(WorldgenError::InvalidConfig {
            reason: "Base priority must be greater than 0".to_string(),
        });
    }
    Ok((base, walk, climb))
}

/// Parse falloff "POWER,SCALE"
pub fn parse_falloff(input: &str) -> WorldgenResult<(f32, f32)> {
    let [power, scale] = parse_delimited::<f32, 2>(input, ',', "falloff")?;
    if power <= 0.0 || scale <= 0.0 {
        return Err(WorldgenError::InvalidConfig {
            reason: "Falloff power and scale must be positive".to_string(),
        });
    }
    Ok((power, scale))
}

pub fn parse_blocked_policy(input: &str) -> WorldgenResult<BlockedPolicy> {
    match input.trim().to_lowercase().as_str() {
        "detour" => Ok(BlockedPolicy::Detour),
        "impassable" => Ok(BlockedPolicy::Impassable),
        other => Err(WorldgenError::InvalidConfig {
            reason: format!("Unknown blocked policy: '{other}'. Available: detour, impassable"),
        }),
    }
}

pub fn parse_route_target(input: &str) -> WorldgenResult<RouteTarget> {
    match input.trim().to_lowercase().as_str() {
        "center" | "centre" => Ok(RouteTarget::Center),
        "lowest" | "lowest_point" => Ok(RouteTarget::LowestPoint),
        other => Err(WorldgenError::InvalidConfig {
            reason: format!("Unknown route target: '{other}'. Available: center, lowest"),
        }),
    }
}

/// Warn about octave counts the config will clamp
pub fn validate_octaves(octaves: i32) -> i32 {
    if octaves < 1 {
        tracing::warn!("Octave count {octaves} is below 1, using 1");
    }
    octaves
}
