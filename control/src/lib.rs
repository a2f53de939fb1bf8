use log::warn;
use ssfconsts::*;
use ssftypes::*;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    str::FromStr,
};

#[derive(Debug, Clone)]
pub struct Control {
    verbosity: String,

    block_size: usize,
    grid_width: usize, // 0 : cover all particles
    grid_height: usize,

    finalize_block: usize,
    finalize_groups: usize, // 0 : one group per wavevector

    precision: String, // single, double

    host_check: bool,
    check_tolerance: f64,
}

impl Default for Control {
    fn default() -> Self {
        Control {
            verbosity: "high".to_string(),

            block_size: DEFAULT_BLOCK_SIZE,
            grid_width: 0,
            grid_height: 1,

            finalize_block: DEFAULT_FINALIZE_BLOCK_SIZE,
            finalize_groups: 0,

            precision: "double".to_string(),

            host_check: false,
            check_tolerance: EPS6,
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("{} = {} : cannot parse value", key, value))
}

impl Control {
    pub fn new() -> Control {
        Control::default()
    }

    pub fn get_verbosity(&self) -> &str {
        &self.verbosity
    }

    pub fn get_block_size(&self) -> usize {
        self.block_size
    }

    pub fn get_grid_width(&self) -> usize {
        self.grid_width
    }

    pub fn get_grid_height(&self) -> usize {
        self.grid_height
    }

    pub fn get_finalize_block(&self) -> usize {
        self.finalize_block
    }

    pub fn get_finalize_groups(&self) -> usize {
        self.finalize_groups
    }

    pub fn get_precision(&self) -> &str {
        &self.precision
    }

    pub fn is_single_precision(&self) -> bool {
        "single" == self.get_precision()
    }

    pub fn get_host_check(&self) -> bool {
        self.host_check
    }

    pub fn get_check_tolerance(&self) -> f64 {
        self.check_tolerance
    }

    pub fn set_host_check(&mut self, host_check: bool) {
        self.host_check = host_check;
    }

    pub fn set_precision(&mut self, precision: &str) {
        self.precision = precision.trim().to_lowercase();
    }

    pub fn read_file(&mut self, inpfile: &str) -> SsfResult<()> {
        let lines = self.read_file_data_to_vec(inpfile)?;

        self.read_lines(&lines)
    }

    pub fn read_file_data_to_vec(&self, inpfile: &str) -> SsfResult<Vec<String>> {
        let file = File::open(inpfile)?;

        let mut lines = Vec::new();

        for line in BufReader::new(file).lines() {
            lines.push(line?);
        }

        Ok(lines)
    }

    /// Applies `key = value` lines on top of the current settings.
    ///
    /// Bad lines are collected and reported together as one error.
    pub fn read_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> SsfResult<()> {
        let mut errors = Vec::new();

        for line in lines.iter() {
            let line = line.as_ref();
            let line = line.split('#').next().unwrap_or("").trim();

            if line.is_empty() {
                continue;
            }

            let s: Vec<&str> = line.splitn(2, '=').map(|x| x.trim()).collect();

            if s.len() != 2 {
                errors.push(format!("{} : expected key = value", line));
                continue;
            }

            let (key, value) = (s[0], s[1]);

            let applied = match key {
                "verbosity" => parse_value(key, value).map(|v| self.verbosity = v),

                "block_size" => parse_value(key, value).map(|v| self.block_size = v),

                "grid_width" => parse_value(key, value).map(|v| self.grid_width = v),

                "grid_height" => parse_value(key, value).map(|v| self.grid_height = v),

                "finalize_block" => parse_value(key, value).map(|v| self.finalize_block = v),

                "finalize_groups" => parse_value(key, value).map(|v| self.finalize_groups = v),

                "precision" => match value.to_lowercase().as_str() {
                    "single" | "double" => {
                        self.set_precision(value);
                        Ok(())
                    }
                    _ => Err(format!("{} = {} : expected single or double", key, value)),
                },

                "host_check" => parse_value(key, value).map(|v| self.host_check = v),

                "check_tolerance" => parse_value(key, value).map(|v| self.check_tolerance = v),

                _ => Err(format!("unknown parameter : {}", line)),
            };

            if let Err(e) = applied {
                warn!("{}", e);
                errors.push(e);
            }
        }

        if !errors.is_empty() {
            return Err(SsfError::InvalidParameter(errors.join("; ")));
        }

        // group sizes are checked here so a bad file fails before any dispatch

        check_group_size(self.block_size)?;
        check_group_size(self.finalize_block)?;

        if self.grid_height == 0 {
            return Err(SsfError::InvalidParameter(
                "grid_height must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn launch_grid(&self, npart: usize) -> SsfResult<LaunchGrid> {
        if self.grid_width == 0 {
            let grid = LaunchGrid::covering(npart, self.block_size)?;

            LaunchGrid::new(
                self.block_size,
                (grid.get_grid_width() + self.grid_height - 1) / self.grid_height.max(1),
                self.grid_height,
            )
        } else {
            LaunchGrid::new(self.block_size, self.grid_width, self.grid_height)
        }
    }

    pub fn finalize_grid(&self) -> SsfResult<FinalizeGrid> {
        if self.finalize_groups == 0 {
            FinalizeGrid::per_wavevector(self.finalize_block)
        } else {
            FinalizeGrid::strided(self.finalize_block, self.finalize_groups)
        }
    }

    pub fn display(&self) {
        const OUT_WIDTH1: usize = 28;
        const OUT_WIDTH2: usize = 18;

        println!("   {:-^80}", " control parameters ");
        println!();

        println!(
            "   {:<width1$} = {:>width2$}",
            "precision",
            self.get_precision(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!(
            "   {:<width1$} = {:>width2$}",
            "block_size",
            self.get_block_size(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        if self.grid_width == 0 {
            println!(
                "   {:<width1$} = {:>width2$}",
                "grid_width",
                "cover",
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );
        } else {
            println!(
                "   {:<width1$} = {:>width2$}",
                "grid_width",
                self.get_grid_width(),
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );
        }

        println!(
            "   {:<width1$} = {:>width2$}",
            "grid_height",
            self.get_grid_height(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!(
            "   {:<width1$} = {:>width2$}",
            "finalize_block",
            self.get_finalize_block(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        if self.finalize_groups == 0 {
            println!(
                "   {:<width1$} = {:>width2$}",
                "finalize_groups",
                "per wavevector",
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );
        } else {
            println!(
                "   {:<width1$} = {:>width2$}",
                "finalize_groups",
                self.get_finalize_groups(),
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );
        }

        println!(
            "   {:<width1$} = {:>width2$}",
            "host_check",
            self.get_host_check(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!(
            "   {:<width1$} = {:>width2$.3E}",
            "check_tolerance",
            self.get_check_tolerance(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!();
    }
}
