//! CSV output streams and the platform loader.
//!
//! Every writer here is deliberately thin: open-append-flush, no schema
//! validation beyond what the in-memory types already guarantee. The
//! columns are fixed, UTF-8, LF-terminated, and each file is written in
//! full once per run except the four append streams the search engine
//! feeds incrementally.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::Task;
use crate::processor::Processor;
use crate::scheduler::Scheduler;
use crate::search::TaskSet;

fn append_writer(path: &Path) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

fn ids_column(subset: &TaskSet) -> String {
    subset
        .ids()
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Owns the output directory's file handles for the duration of a run.
pub struct OutputSink {
    hyperedges: BufWriter<File>,
    negatives: BufWriter<File>,
    mucs: BufWriter<File>,
    gantt_dir: PathBuf,
}

impl OutputSink {
    pub fn create(output_dir: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(output_dir)?;

        let hyperedges_path = output_dir.join("hyperedges.csv");
        let negatives_path = output_dir.join("negative_samples.csv");
        let mucs_path = output_dir.join("minimal_unschedulable_combinations.csv");

        let gantt_dir = output_dir.join("gantt");

        Ok(Self {
            hyperedges: append_writer(&hyperedges_path)?,
            negatives: append_writer(&negatives_path)?,
            mucs: append_writer(&mucs_path)?,
            gantt_dir,
        })
    }

    pub fn append_hyperedge(&mut self, subset: &TaskSet) -> io::Result<()> {
        writeln!(self.hyperedges, "{}", ids_column(subset))
    }

    pub fn append_negative(&mut self, subset: &TaskSet) -> io::Result<()> {
        writeln!(self.negatives, "{}", ids_column(subset))
    }

    pub fn append_muc(&mut self, subset: &TaskSet) -> io::Result<()> {
        writeln!(self.mucs, "{}", ids_column(subset))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.hyperedges.flush()?;
        self.negatives.flush()?;
        self.mucs.flush()
    }

    /// Dumps `scheduler`'s per-processor execution history for `subset` as
    /// its own CSV, one row per `(task_id, instance_id, start, duration)`
    /// tuple, named after the subset's task ids.
    pub fn write_gantt(&mut self, subset: &TaskSet, scheduler: &Scheduler<'_>) -> io::Result<()> {
        std::fs::create_dir_all(&self.gantt_dir)?;

        let name = subset
            .ids()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("-");
        let path = self.gantt_dir.join(format!("gantt_{name}.csv"));

        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "processor_id,task_id,instance_id,start_time,duration")?;
        for (processor_id, task_id, instance_id, start_time, duration) in scheduler.history() {
            writeln!(writer, "{processor_id},{task_id},{instance_id},{start_time},{duration}")?;
        }
        writer.flush()
    }
}

/// Writes the full platform table in one shot: one row per processor,
/// `processor_id,speed`, no header, in `processors`' order.
pub fn write_platform(output_dir: &Path, processors: &[Processor]) -> io::Result<()> {
    std::fs::create_dir_all(output_dir)?;
    let mut writer = BufWriter::new(File::create(output_dir.join("platform.csv"))?);
    for p in processors {
        writeln!(writer, "{},{}", p.id, p.speed)?;
    }
    writer.flush()
}

/// Reads back a platform previously written by [`write_platform`].
pub fn read_platform(path: &Path) -> io::Result<Vec<Processor>> {
    let contents = std::fs::read_to_string(path)?;
    let mut processors = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (id, speed) = line.split_once(',').ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, format!("malformed platform row: {line}"))
        })?;
        let speed: u64 = speed
            .parse()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, format!("bad speed in row: {line}")))?;
        processors.push(Processor::new(id, speed));
    }

    Ok(processors)
}

/// Writes the full task table in one shot: one row per task, `e,d,T,u`
/// as floating-point values, no header, no `task_id` column — the row
/// index (ascending by the caller's ordering) is the task id.
pub fn write_tasks(output_dir: &Path, tasks: &[Task]) -> io::Result<()> {
    std::fs::create_dir_all(output_dir)?;
    let mut writer = BufWriter::new(File::create(output_dir.join("task_quadruples.csv"))?);
    for t in tasks {
        writeln!(writer, "{},{},{},{}", t.e, t.d, t.period, t.utilization())?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_column_joins_with_commas() {
        let subset = TaskSet::new(vec![3, 1, 2]);
        assert_eq!(ids_column(&subset), "1,2,3");
    }

    #[test]
    fn platform_round_trips_through_csv() {
        let dir = tempdir();
        let processors = vec![Processor::new("P0", 3), Processor::new("P1", 1)];
        write_platform(&dir, &processors).unwrap();

        let loaded = read_platform(&dir.join("platform.csv")).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "P0");
        assert_eq!(loaded[0].speed, 3);
        assert_eq!(loaded[1].id, "P1");
        assert_eq!(loaded[1].speed, 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn sink_appends_across_multiple_calls() {
        let dir = tempdir();
        {
            let mut sink = OutputSink::create(&dir).unwrap();
            sink.append_hyperedge(&TaskSet::new(vec![0, 1])).unwrap();
            sink.append_negative(&TaskSet::new(vec![2])).unwrap();
            sink.flush().unwrap();
        }
        {
            let mut sink = OutputSink::create(&dir).unwrap();
            sink.append_hyperedge(&TaskSet::new(vec![3])).unwrap();
            sink.flush().unwrap();
        }

        let contents = std::fs::read_to_string(dir.join("hyperedges.csv")).unwrap();
        assert_eq!(contents, "0,1\n3\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn task_quadruples_have_no_header_and_carry_utilization() {
        let dir = tempdir();
        let tasks = vec![Task::new(0, 3, 10, 10).unwrap(), Task::new(1, 5, 20, 20).unwrap()];
        write_tasks(&dir, &tasks).unwrap();

        let contents = std::fs::read_to_string(dir.join("task_quadruples.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "3,10,10,0.3");
        assert_eq!(lines[1], "5,20,20,0.25");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    fn tempdir() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("edf-hyperedge-gen-test-{}", std::process::id()));
        path.push(uniquify());
        path
    }

    fn uniquify() -> String {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        COUNTER.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
