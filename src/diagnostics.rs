//! Boot and runtime diagnostics.
//!
//! The boot report captures the numbers worth eyeballing on every power-up
//! (free heap, PSRAM, flash size) before any subsystem starts. Runtime
//! metrics are collected on-demand from the idle loop so a long-running
//! device leaves a heap trace in the serial log.

use log::{error, info};

// ───────────────────────────────────────────────────────────────
// Boot report
// ───────────────────────────────────────────────────────────────

/// One-shot hardware snapshot taken right after bring-up.
#[derive(Debug, Clone, Copy)]
pub struct BootReport {
    pub heap_free: u32,
    pub heap_min_free: u32,
    pub psram_free: u32,
    pub flash_size_bytes: u32,
}

impl BootReport {
    #[cfg(target_os = "espidf")]
    pub fn collect() -> Self {
        use esp_idf_svc::sys::*;

        let heap_free = unsafe { esp_get_free_heap_size() };
        let heap_min_free = unsafe { esp_get_minimum_free_heap_size() };
        // Zero on modules without PSRAM; the log line still prints.
        let psram_free = unsafe { heap_caps_get_free_size(MALLOC_CAP_SPIRAM) } as u32;

        let mut flash_size_bytes: u32 = 0;
        // SAFETY: null selects the default (boot) flash chip, probed by the
        // ROM bootloader long before we run.
        let ret = unsafe { esp_flash_get_size(core::ptr::null_mut(), &mut flash_size_bytes) };
        if ret != ESP_OK {
            flash_size_bytes = 0;
        }

        Self {
            heap_free,
            heap_min_free,
            psram_free,
            flash_size_bytes,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn collect() -> Self {
        // Realistic synthetic values so simulation runs exercise the same
        // log paths as real hardware.
        Self {
            heap_free: 307_200,
            heap_min_free: 291_840,
            psram_free: 2_097_152,
            flash_size_bytes: 4 * 1024 * 1024,
        }
    }

    /// Print the snapshot in the boot banner format.
    pub fn log(&self) {
        info!(
            "BOOT  | heap free: {} B (min ever: {} B)",
            self.heap_free, self.heap_min_free
        );
        info!("BOOT  | PSRAM free: {} B", self.psram_free);
        info!(
            "BOOT  | flash size: {} MB",
            self.flash_size_bytes / (1024 * 1024)
        );
    }
}

// ───────────────────────────────────────────────────────────────
// Runtime metrics
// ───────────────────────────────────────────────────────────────

/// Heap and uptime snapshot collected on-demand from the idle loop.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeMetrics {
    pub uptime_secs: u64,
    pub heap_free: u32,
    pub heap_min_free: u32,
}

impl RuntimeMetrics {
    #[cfg(target_os = "espidf")]
    pub fn collect(uptime_secs: u64) -> Self {
        use esp_idf_svc::sys::*;

        let heap_free = unsafe { esp_get_free_heap_size() };
        let heap_min_free = unsafe { esp_get_minimum_free_heap_size() };

        Self {
            uptime_secs,
            heap_free,
            heap_min_free,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn collect(uptime_secs: u64) -> Self {
        // Heap "decays" slightly over time to model fragmentation.
        let base_free: u32 = 307_200; // 300 KB
        let decay = (uptime_secs / 60) as u32 * 512; // lose ~512B/min
        let heap_free = base_free.saturating_sub(decay);
        let heap_min_free = (heap_free as f32 * 0.85) as u32;

        Self {
            uptime_secs,
            heap_free,
            heap_min_free,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Panic handler — makes sure the reason reaches the serial log
// ───────────────────────────────────────────────────────────────

/// Install a panic hook that logs the panic reason and uptime before the
/// default handler aborts (and, on hardware, the watchdog resets us).
///
/// Call once during init, right after the logger is up.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: esp_timer_get_time is safe to call from panic context
            // (it is a simple RTC counter read with no dynamic allocation).
            let uptime = (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000;
            error!("PANIC after {}s uptime: {}", uptime, reason);
        }

        #[cfg(not(target_os = "espidf"))]
        error!("PANIC: {}", reason);
    }));
}
