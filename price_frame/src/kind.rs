//! Supported indicator kinds and the named series each one produces.
//!
//! The engine always produces every kind. These enums let a presentation
//! layer pick what to show without reaching into the computation.

use crate::error::FrameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One indicator definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndicatorKind {
    Ema,
    Bollinger,
    Rsi,
    Macd,
    Atr,
    Obv,
    Mfi,
    Envelope,
    Chaikin,
    Stochastic,
    TrendSma,
    ReturnVolatility,
}

impl IndicatorKind {
    /// Every kind, in output order.
    pub const ALL: [IndicatorKind; 12] = [
        IndicatorKind::Ema,
        IndicatorKind::Bollinger,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Atr,
        IndicatorKind::Obv,
        IndicatorKind::Mfi,
        IndicatorKind::Envelope,
        IndicatorKind::Chaikin,
        IndicatorKind::Stochastic,
        IndicatorKind::TrendSma,
        IndicatorKind::ReturnVolatility,
    ];

    /// Short name used for selection.
    pub fn short_name(self) -> &'static str {
        match self {
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Bollinger => "BB",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Atr => "ATR",
            IndicatorKind::Obv => "OBV",
            IndicatorKind::Mfi => "MFI",
            IndicatorKind::Envelope => "ENV",
            IndicatorKind::Chaikin => "CHAIKIN",
            IndicatorKind::Stochastic => "STOCH",
            IndicatorKind::TrendSma => "SMA",
            IndicatorKind::ReturnVolatility => "VOL",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::Ema => "Exponential Moving Average",
            IndicatorKind::Bollinger => "Bollinger Bands",
            IndicatorKind::Rsi => "Relative Strength Index",
            IndicatorKind::Macd => "Moving Average Convergence Divergence",
            IndicatorKind::Atr => "Average True Range (intrabar)",
            IndicatorKind::Obv => "On-Balance Volume (intrabar, non-canonical)",
            IndicatorKind::Mfi => "Money Flow Index",
            IndicatorKind::Envelope => "Moving Average Envelope",
            IndicatorKind::Chaikin => "Chaikin Oscillator",
            IndicatorKind::Stochastic => "Stochastic Oscillator",
            IndicatorKind::TrendSma => "Trend Simple Moving Averages",
            IndicatorKind::ReturnVolatility => "Daily Return Volatility",
        }
    }

    /// Series this kind produces.
    pub fn outputs(self) -> &'static [OutputKey] {
        use OutputKey::*;
        match self {
            IndicatorKind::Ema => &[Ema],
            IndicatorKind::Bollinger => &[BollingerMiddle, BollingerUpper, BollingerLower],
            IndicatorKind::Rsi => &[Rsi],
            IndicatorKind::Macd => &[Macd, MacdSignal, MacdHistogram],
            IndicatorKind::Atr => &[TrueRange, Atr],
            IndicatorKind::Obv => &[Obv],
            IndicatorKind::Mfi => &[Mfi],
            IndicatorKind::Envelope => &[EnvelopeUpper, EnvelopeLower],
            IndicatorKind::Chaikin => &[Adl, ChaikinOscillator],
            IndicatorKind::Stochastic => &[StochasticK, StochasticD],
            IndicatorKind::TrendSma => &[SmaShort, SmaLong],
            IndicatorKind::ReturnVolatility => &[DailyReturn, ReturnVolatility],
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for IndicatorKind {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        IndicatorKind::ALL
            .into_iter()
            .find(|k| k.short_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FrameError::UnknownIndicator(s.to_string()))
    }
}

/// One named series in an indicator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutputKey {
    #[serde(rename = "EMA")]
    Ema,
    #[serde(rename = "BB_Middle")]
    BollingerMiddle,
    #[serde(rename = "BB_Upper")]
    BollingerUpper,
    #[serde(rename = "BB_Lower")]
    BollingerLower,
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "MACD_Signal")]
    MacdSignal,
    #[serde(rename = "MACD_Histogram")]
    MacdHistogram,
    #[serde(rename = "TR")]
    TrueRange,
    #[serde(rename = "ATR")]
    Atr,
    #[serde(rename = "OBV")]
    Obv,
    #[serde(rename = "MFI")]
    Mfi,
    #[serde(rename = "Envelope_Upper")]
    EnvelopeUpper,
    #[serde(rename = "Envelope_Lower")]
    EnvelopeLower,
    #[serde(rename = "ADL")]
    Adl,
    #[serde(rename = "Chaikin_Oscillator")]
    ChaikinOscillator,
    #[serde(rename = "%K")]
    StochasticK,
    #[serde(rename = "%D")]
    StochasticD,
    #[serde(rename = "SMA_Short")]
    SmaShort,
    #[serde(rename = "SMA_Long")]
    SmaLong,
    #[serde(rename = "Daily_Return")]
    DailyReturn,
    #[serde(rename = "Return_Volatility")]
    ReturnVolatility,
}

impl OutputKey {
    /// Every output, in set order.
    pub fn all() -> impl Iterator<Item = OutputKey> {
        IndicatorKind::ALL
            .into_iter()
            .flat_map(|kind| kind.outputs().iter().copied())
    }

    /// Name the series is published under.
    pub fn name(self) -> &'static str {
        match self {
            OutputKey::Ema => "EMA",
            OutputKey::BollingerMiddle => "BB_Middle",
            OutputKey::BollingerUpper => "BB_Upper",
            OutputKey::BollingerLower => "BB_Lower",
            OutputKey::Rsi => "RSI",
            OutputKey::Macd => "MACD",
            OutputKey::MacdSignal => "MACD_Signal",
            OutputKey::MacdHistogram => "MACD_Histogram",
            OutputKey::TrueRange => "TR",
            OutputKey::Atr => "ATR",
            OutputKey::Obv => "OBV",
            OutputKey::Mfi => "MFI",
            OutputKey::EnvelopeUpper => "Envelope_Upper",
            OutputKey::EnvelopeLower => "Envelope_Lower",
            OutputKey::Adl => "ADL",
            OutputKey::ChaikinOscillator => "Chaikin_Oscillator",
            OutputKey::StochasticK => "%K",
            OutputKey::StochasticD => "%D",
            OutputKey::SmaShort => "SMA_Short",
            OutputKey::SmaLong => "SMA_Long",
            OutputKey::DailyReturn => "Daily_Return",
            OutputKey::ReturnVolatility => "Return_Volatility",
        }
    }

    /// Kind that produces this output.
    pub fn kind(self) -> IndicatorKind {
        match self {
            OutputKey::Ema => IndicatorKind::Ema,
            OutputKey::BollingerMiddle | OutputKey::BollingerUpper | OutputKey::BollingerLower => {
                IndicatorKind::Bollinger
            }
            OutputKey::Rsi => IndicatorKind::Rsi,
            OutputKey::Macd | OutputKey::MacdSignal | OutputKey::MacdHistogram => {
                IndicatorKind::Macd
            }
            OutputKey::TrueRange | OutputKey::Atr => IndicatorKind::Atr,
            OutputKey::Obv => IndicatorKind::Obv,
            OutputKey::Mfi => IndicatorKind::Mfi,
            OutputKey::EnvelopeUpper | OutputKey::EnvelopeLower => IndicatorKind::Envelope,
            OutputKey::Adl | OutputKey::ChaikinOscillator => IndicatorKind::Chaikin,
            OutputKey::StochasticK | OutputKey::StochasticD => IndicatorKind::Stochastic,
            OutputKey::SmaShort | OutputKey::SmaLong => IndicatorKind::TrendSma,
            OutputKey::DailyReturn | OutputKey::ReturnVolatility => {
                IndicatorKind::ReturnVolatility
            }
        }
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputKey {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputKey::all()
            .find(|key| key.name() == s)
            .ok_or_else(|| FrameError::UnknownIndicator(s.to_string()))
    }
}
