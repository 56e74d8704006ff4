use sipreel_core::render::entity::FrameSchedule;
use sipreel_core::simulation::error::SimulationError;

/// # Summary
/// 生成帧截断点序列，用有限帧近似逐行增长的动画。
///
/// # Logic
/// 1. `n >= num_frames`：在闭区间 `[1, n]` 上按数值等距取 `num_frames` 个点，
///    四舍五入（.5 远离零）到最近整数。全部使用整数运算，结果可复现。
/// 2. `n < num_frames`：先逐行输出 `1..=n`，再重复 `n` 补足到 `num_frames` 个，
///    末尾为静止的重复帧。
///
/// # Arguments
/// * `n`: 结果表行数。
/// * `num_frames`: 目标帧数。
///
/// # Returns
/// 长度恰为 `num_frames`、单调不减且以 `n` 结尾的序列；任一参数为 0 时返回 `InvalidInput`。
pub fn frame_schedule(n: usize, num_frames: usize) -> Result<FrameSchedule, SimulationError> {
    if n == 0 {
        return Err(SimulationError::InvalidInput(
            "row count must be positive".to_string(),
        ));
    }
    if num_frames == 0 {
        return Err(SimulationError::InvalidInput(
            "frame count must be positive".to_string(),
        ));
    }

    if n < num_frames {
        let mut cut_points: Vec<usize> = (1..=n).collect();
        cut_points.resize(num_frames, n);
        return Ok(FrameSchedule::new(cut_points));
    }

    if num_frames == 1 {
        return Ok(FrameSchedule::new(vec![n]));
    }

    let span = n - 1;
    let steps = num_frames - 1;
    let overflow =
        || SimulationError::InvalidInput(format!("frame schedule overflow for n={n}"));

    let mut cut_points = Vec::with_capacity(num_frames);
    for i in 0..num_frames {
        // round(span * i / steps) = floor((2 * span * i + steps) / (2 * steps))
        let numerator = span
            .checked_mul(i)
            .and_then(|v| v.checked_mul(2))
            .and_then(|v| v.checked_add(steps))
            .ok_or_else(overflow)?;
        cut_points.push(1 + numerator / (2 * steps));
    }

    Ok(FrameSchedule::new(cut_points))
}
