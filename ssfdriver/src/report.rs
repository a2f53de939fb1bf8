use ssftypes::FinalizeLayout;

/// A wavevector (or finalize group) whose engine value strays from the host value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub sample: usize,
    pub index: usize,
    pub deviation: f64,
}

#[derive(Debug, Clone)]
pub struct HostCheck {
    host_seconds: f64,
    tolerance: f64,
    max_deviation: f64,
    mismatches: Vec<Mismatch>,
}

impl HostCheck {
    pub fn new(tolerance: f64) -> HostCheck {
        HostCheck {
            host_seconds: 0.0,
            tolerance,
            max_deviation: 0.0,
            mismatches: Vec::new(),
        }
    }

    pub fn add_time(&mut self, seconds: f64) {
        self.host_seconds += seconds;
    }

    pub fn add_deviations(&mut self, sample: usize, deviations: &[f64]) {
        for (index, d) in deviations.iter().enumerate() {
            if *d > self.max_deviation {
                self.max_deviation = *d;
            }

            if *d > self.tolerance {
                self.mismatches.push(Mismatch {
                    sample,
                    index,
                    deviation: *d,
                });
            }
        }
    }

    pub fn get_host_seconds(&self) -> f64 {
        self.host_seconds
    }

    pub fn get_tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn get_max_deviation(&self) -> f64 {
        self.max_deviation
    }

    pub fn get_mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SsfReport {
    sfact: Vec<f64>,
    layout: FinalizeLayout,
    npart: usize,
    nq: usize,
    nsample: usize,
    engine_seconds: f64,
    host: Option<HostCheck>,
}

impl SsfReport {
    pub fn new(
        sfact: Vec<f64>,
        layout: FinalizeLayout,
        npart: usize,
        nq: usize,
        nsample: usize,
        engine_seconds: f64,
        host: Option<HostCheck>,
    ) -> SsfReport {
        SsfReport {
            sfact,
            layout,
            npart,
            nq,
            nsample,
            engine_seconds,
            host,
        }
    }

    /// S(q) averaged over the snapshots, laid out as `get_layout()` says.
    pub fn get_sfact(&self) -> &[f64] {
        &self.sfact
    }

    pub fn get_layout(&self) -> FinalizeLayout {
        self.layout
    }

    pub fn get_npart(&self) -> usize {
        self.npart
    }

    pub fn get_nq(&self) -> usize {
        self.nq
    }

    pub fn get_nsample(&self) -> usize {
        self.nsample
    }

    pub fn get_engine_seconds(&self) -> f64 {
        self.engine_seconds
    }

    pub fn get_host_check(&self) -> Option<&HostCheck> {
        self.host.as_ref()
    }

    /// Sum of S(q) over the wavevectors per wavevector and per particle.
    pub fn normalized(&self) -> f64 {
        if self.nq == 0 || self.npart == 0 {
            return 0.0;
        }

        self.sfact.iter().sum::<f64>() / (self.nq * self.npart) as f64
    }

    pub fn speedup(&self) -> Option<f64> {
        let host = self.host.as_ref()?;

        if self.engine_seconds > 0.0 {
            Some(host.get_host_seconds() / self.engine_seconds)
        } else {
            None
        }
    }

    pub fn display(&self) {
        const OUT_WIDTH1: usize = 28;
        const OUT_WIDTH2: usize = 18;

        println!("   {:-^80}", " static structure factor ");
        println!();

        let label = match self.layout {
            FinalizeLayout::PerWavevector => "iq",
            FinalizeLayout::Strided { .. } => "group",
        };

        for (i, s) in self.sfact.iter().enumerate() {
            println!("   {:>8} {:>8} {:>20.10E}", label, i, s);
        }

        println!();

        println!(
            "   {:<width1$} = {:>width2$}",
            "samples",
            self.nsample,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!(
            "   {:<width1$} = {:>width2$.6}",
            "S / (nq * npart)",
            self.normalized(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!(
            "   {:<width1$} = {:>width2$.3} s",
            "engine time",
            self.engine_seconds,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        if let Some(host) = self.host.as_ref() {
            println!(
                "   {:<width1$} = {:>width2$.3} s",
                "host time",
                host.get_host_seconds(),
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );

            if let Some(speedup) = self.speedup() {
                println!(
                    "   {:<width1$} = {:>width2$.1}",
                    "speedup",
                    speedup,
                    width1 = OUT_WIDTH1,
                    width2 = OUT_WIDTH2
                );
            }

            println!(
                "   {:<width1$} = {:>width2$.3E}",
                "max rel. deviation",
                host.get_max_deviation(),
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );

            for m in host.get_mismatches().iter() {
                println!(
                    "   sample {:>4} {:>6} {:>6} : {:.3E}",
                    m.sample, label, m.index, m.deviation
                );
            }
        }

        println!();
    }
}
