use crate::common::Frequency;
use crate::simulation::error::SimulationError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单日价格点。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// # Summary
/// 经过校验的日频价格序列，是模拟器唯一接受的输入类型。
///
/// # Invariants
/// - 非空，日期严格递增且逐日连续，`[first_date, last_date]` 内每个自然日恰好一条。
/// - 所有价格均为有限正数；缺失日期继承前一个观测日的价格（只向前填充，不插值）。
/// - 只有单一价格列，多层列结构必须在边界适配器中展平。
/// - 序列化只保留实际观测点，反序列化重新经过 `from_observations` 校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<PricePoint>", try_from = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    // 与 points 等长，标记该日价格是否为实际观测（而非向前填充）
    observed: Vec<bool>,
}

impl PriceSeries {
    /// # Summary
    /// 由原始观测值构建价格序列。
    ///
    /// # Logic
    /// 1. 按日期排序，同一日期保留最后一条观测。
    /// 2. 丢弃缺失值 (None / NaN)，拒绝非正或无穷价格。
    /// 3. 从首个观测日到最后一个观测日逐日展开，缺失日向前填充。
    ///
    /// # Arguments
    /// * `observations`: (日期, 价格) 列表，价格可缺失。
    ///
    /// # Returns
    /// 成功返回 PriceSeries；空输入、无有效价格或存在非正价格时返回 `InvalidInput`。
    pub fn from_observations(
        mut observations: Vec<(NaiveDate, Option<f64>)>,
    ) -> Result<Self, SimulationError> {
        if observations.is_empty() {
            return Err(SimulationError::InvalidInput(
                "price series is empty".to_string(),
            ));
        }

        observations.sort_by_key(|(date, _)| *date);

        let mut observed: Vec<PricePoint> = Vec::with_capacity(observations.len());
        for (date, price) in observations {
            let Some(price) = price.filter(|p| !p.is_nan()) else {
                continue;
            };
            if !price.is_finite() || price <= 0.0 {
                return Err(SimulationError::InvalidInput(format!(
                    "non-positive price {price} on {date}"
                )));
            }
            match observed.last_mut() {
                Some(last) if last.date == date => last.price = price,
                _ => observed.push(PricePoint { date, price }),
            }
        }

        let (Some(first), Some(last)) = (observed.first().copied(), observed.last().copied())
        else {
            return Err(SimulationError::InvalidInput(
                "price series contains no positive price".to_string(),
            ));
        };

        let mut points = Vec::new();
        let mut flags = Vec::new();
        let mut cursor = 0usize;
        let mut current = first;
        let mut date = first.date;
        loop {
            let mut hit = false;
            while let Some(next) = observed.get(cursor) {
                if next.date > date {
                    break;
                }
                current = *next;
                hit = true;
                cursor += 1;
            }
            points.push(PricePoint {
                date,
                price: current.price,
            });
            flags.push(hit);
            if date >= last.date {
                break;
            }
            date = date.succ_opt().ok_or_else(|| {
                SimulationError::InvalidInput(format!("date overflow after {date}"))
            })?;
        }

        Ok(Self {
            points,
            observed: flags,
        })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// 实际观测到价格的点（不含向前填充的日期）
    pub fn observed_points(&self) -> Vec<PricePoint> {
        self.points
            .iter()
            .zip(&self.observed)
            .filter(|(_, observed)| **observed)
            .map(|(point, _)| *point)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// # Summary
    /// 按周期降采样，每个周期取第一条实际观测记录。
    ///
    /// # Logic
    /// 1. `Daily` 原样返回逐日序列（含向前填充）。
    /// 2. 周按 ISO 周（周一至周日）分组，月按自然月分组，只在观测点上取首条，
    ///    周期首日休市时顺延到该周期内的下一个交易日。
    /// 3. 整个周期都没有观测的会被跳过。
    ///
    /// # Returns
    /// 降采样后的价格点，不再满足逐日连续约束，因此不包装为 PriceSeries。
    pub fn resample(&self, frequency: Frequency) -> Vec<PricePoint> {
        if frequency == Frequency::Daily {
            return self.points.clone();
        }

        let period_key = |date: NaiveDate| -> (i32, u32) {
            match frequency {
                Frequency::Daily => (date.year(), date.ordinal()),
                Frequency::Weekly => {
                    let week = date.iso_week();
                    (week.year(), week.week())
                }
                Frequency::Monthly => (date.year(), date.month()),
            }
        };

        let mut sampled: Vec<PricePoint> = Vec::new();
        let mut last_key = None;
        for point in self.observed_points() {
            let key = period_key(point.date);
            if last_key != Some(key) {
                sampled.push(point);
                last_key = Some(key);
            }
        }
        sampled
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.observed_points()
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = SimulationError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::from_observations(points.into_iter().map(|p| (p.date, Some(p.price))).collect())
    }
}
