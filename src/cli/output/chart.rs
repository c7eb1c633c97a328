use std::io::Write;

use ansi_term::Colour;
use anyhow::{bail, Result};

use crate::{utils::time::format_day, view::ChartSeries};

/// Identifies a chart drawn by a [ChartSink].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartHandle(pub u64);

/// Anything able to display a [ChartSeries]. A drawn chart stays visible until cleared.
#[cfg_attr(test, mockall::automock)]
pub trait ChartSink {
    fn draw(&mut self, series: &ChartSeries) -> Result<ChartHandle>;

    fn clear(&mut self, handle: ChartHandle) -> Result<()>;
}

/// Keeps at most one chart alive. Rendering new data always removes the previous chart first.
pub struct ChartRenderer<S> {
    sink: S,
    current: Option<ChartHandle>,
}

impl<S: ChartSink> ChartRenderer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
        }
    }

    pub fn render(&mut self, series: &ChartSeries) -> Result<()> {
        if let Some(previous) = self.current.take() {
            self.sink.clear(previous)?;
        }
        self.current = Some(self.sink.draw(series)?);
        Ok(())
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

const BAR_WIDTH: u64 = 40;
const BAR_COLOUR: Colour = Colour::RGB(30, 96, 145);

/// Draws horizontal bars into a terminal. Clearing moves the cursor back over the drawn lines
/// and erases them.
pub struct TerminalChart<W> {
    out: W,
    colored: bool,
    next_id: u64,
    drawn: Option<(ChartHandle, usize)>,
}

impl<W: Write> TerminalChart<W> {
    pub fn new(out: W, colored: bool) -> Self {
        Self {
            out,
            colored,
            next_id: 0,
            drawn: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn lines(&self, series: &ChartSeries) -> Vec<String> {
        let mut lines = vec![series.title.clone()];
        if series.is_empty() {
            lines.push("No words logged yet".into());
            return lines;
        }

        // Bars start from zero, so the longest bar always belongs to the maximum.
        let max = series.values.iter().copied().max().unwrap_or(0).max(1);
        for (label, value) in series.labels.iter().zip(&series.values) {
            let length = (u128::from(*value) * u128::from(BAR_WIDTH))
                .div_ceil(u128::from(max)) as usize;
            let bar = "█".repeat(length);
            let bar = if self.colored {
                BAR_COLOUR.paint(bar).to_string()
            } else {
                bar
            };
            lines.push(format!("{}\t{bar} {value}", format_day(*label)));
        }
        lines
    }
}

impl<W: Write> ChartSink for TerminalChart<W> {
    fn draw(&mut self, series: &ChartSeries) -> Result<ChartHandle> {
        let lines = self.lines(series);
        for line in &lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;

        let handle = ChartHandle(self.next_id);
        self.next_id += 1;
        self.drawn = Some((handle, lines.len()));
        Ok(handle)
    }

    fn clear(&mut self, handle: ChartHandle) -> Result<()> {
        match self.drawn {
            Some((drawn, lines)) if drawn == handle => {
                write!(self.out, "\x1b[{lines}A\x1b[J")?;
                self.out.flush()?;
                self.drawn = None;
                Ok(())
            }
            _ => bail!("Chart {handle:?} is not on screen"),
        }
    }
}
