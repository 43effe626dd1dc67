use std::io::Write;

use anyhow::{Context, Result};
use screamporium_rendering::{CellRole, RenderingBackend, Scene};

/// Backend that prints scenes as character grids.
///
/// Legend: `.` ground, `#` impassable ground, `B` block, `S` source, `X`
/// sink, `m` mob, `+` highlight.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    frame: u64,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, frame: 0 }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        self.frame += 1;
        let width = usize::try_from(scene.width).unwrap_or(0);
        let mut rows: Vec<Vec<char>> = scene
            .cells
            .chunks(width.max(1))
            .map(|row| row.iter().map(glyph).collect())
            .collect();

        for highlight in &scene.highlights {
            plot(&mut rows, highlight.position.x(), highlight.position.y(), '+');
        }
        for mob in &scene.mobs {
            let cell = (mob.position / scene.cell_size).floor();
            plot(&mut rows, cell.x as i32, cell.y as i32, 'm');
        }

        let hud = scene.hud;
        writeln!(
            self.out,
            "frame {} | geld {} | rating {} | mobs {}{}",
            self.frame,
            hud.geld,
            hud.rating,
            scene.mobs.len(),
            if hud.paused { " | paused" } else { "" },
        )
        .context("failed to write frame header")?;
        for row in rows {
            let line: String = row.into_iter().collect();
            writeln!(self.out, "{line}").context("failed to write frame row")?;
        }
        self.out.flush().context("failed to flush frame")
    }
}

fn glyph(cell: &screamporium_rendering::SceneCell) -> char {
    match cell.role {
        CellRole::Sink => 'X',
        CellRole::Source => 'S',
        CellRole::Block => 'B',
        CellRole::Terrain if cell.passable => '.',
        CellRole::Terrain => '#',
    }
}

fn plot(rows: &mut [Vec<char>], x: i32, y: i32, symbol: char) {
    let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
        return;
    };
    if let Some(slot) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
        *slot = symbol;
    }
}
