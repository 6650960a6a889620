//! ----- DEBUG MODULE -----
//! Redraws a table of every car in place on the terminal.

use std::io::Write;

use crossterm::{cursor, terminal, ExecutableCommand, Result};

use shared_resources::car_status::CarSnapshot;

const SEPARATOR: &str =
    "+-----+------------------------+------+--------+--------+-------------+--------+-------+--------------------+--------+--------+";
// title, separators and column header around the car rows
const FRAME_LINES: u16 = 5;

pub struct Dashboard<W: Write> {
    out: W,
    height: u16,
}

impl<W: Write> Dashboard<W> {
    pub fn new(out: W) -> Self {
        Dashboard { out, height: 0 }
    }

    pub fn printstatus(&mut self, cars: &[CarSnapshot]) -> Result<()> {
        self.rewind()?;

        writeln!(self.out, "{}", SEPARATOR)?;
        writeln!(self.out, "| {0:<123} |", "ELEVATOR FLEET")?;
        writeln!(self.out, "{}", SEPARATOR)?;
        writeln!(
            self.out,
            "| {0:<3} | {1:<22} | {2:<4} | {3:<6} | {4:<6} | {5:<11} | {6:<6} | {7:<5} | {8:<18} | {9:<6} | {10:<6} |",
            "ID", "NAME", "AT", "DIR", "DOOR", "STATUS", "MANUAL", "EMERG", "CALLS", "RUN", "STARTS"
        )?;
        writeln!(self.out, "{}", SEPARATOR)?;
        for car in cars {
            writeln!(
                self.out,
                "| {0:<3} | {1:<22} | {2:<4} | {3:<6} | {4:<6} | {5:<11} | {6:<6} | {7:<5} | {8:<18} | {9:>4}m | {10:>6} |",
                car.id,
                car.name,
                car.current_floor,
                car.direction.as_str(),
                car.door_status.as_str(),
                car.run_status.as_str(),
                if car.manual_mode { "yes" } else { "no" },
                if car.emergency_call { "YES" } else { "-" },
                car.sorted_calls.join(","),
                car.run_time_minutes,
                car.startup_count,
            )?;
        }
        writeln!(self.out, "{}", SEPARATOR)?;

        self.height = FRAME_LINES + cars.len() as u16 + 1;
        self.out.flush()?;
        Ok(())
    }

    /// Prints a one-line notice under the table.
    pub fn notice(&mut self, message: &str) -> Result<()> {
        self.rewind()?;
        writeln!(self.out, "{}", message)?;
        self.height = 1;
        self.out.flush()?;
        Ok(())
    }

    fn rewind(&mut self) -> Result<()> {
        if self.height > 0 {
            self.out.execute(cursor::MoveUp(self.height))?;
        }
        self.out.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        Ok(())
    }
}
