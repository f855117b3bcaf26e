//! Interrupt masking abstraction

/// Interrupt control trait
///
/// Flash erase and program must not be interrupted on the target board, and
/// nothing may execute from flash while they run. Persistence code brackets
/// each erase/program pair with `disable` and `restore`.
pub trait InterruptControl {
    /// Disables interrupts, returning whether they were enabled before
    fn disable(&mut self) -> bool;

    /// Restores the state returned by a matching `disable`
    fn restore(&mut self, was_enabled: bool);

    /// Returns whether interrupts are enabled
    fn interrupts_enabled(&self) -> bool;
}

/// Runs `f` with interrupts disabled, then restores the previous state
pub fn without_interrupts<I, R>(irq: &mut I, f: impl FnOnce() -> R) -> R
where
    I: InterruptControl + ?Sized,
{
    let was_enabled = irq.disable();
    let result = f();
    irq.restore(was_enabled);
    result
}

/// Host-side interrupt controller
///
/// There is nothing to mask on a host, so this only tracks state. The
/// critical-section counter lets tests check that flash writes were guarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInterrupts {
    enabled: bool,
    critical_sections: usize,
}

impl HostInterrupts {
    pub fn new() -> Self {
        Self {
            enabled: true,
            critical_sections: 0,
        }
    }

    /// Number of times interrupts went from enabled to disabled
    pub fn critical_sections(&self) -> usize {
        self.critical_sections
    }
}

impl Default for HostInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptControl for HostInterrupts {
    fn disable(&mut self) -> bool {
        let was_enabled = self.enabled;
        if was_enabled {
            self.critical_sections += 1;
        }
        self.enabled = false;
        was_enabled
    }

    fn restore(&mut self, was_enabled: bool) {
        self.enabled = was_enabled;
    }

    fn interrupts_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_interrupts_restores_state() {
        let mut irq = HostInterrupts::new();
        let seen = without_interrupts(&mut irq, || 7);
        assert_eq!(seen, 7);
        assert!(irq.interrupts_enabled());
        assert_eq!(irq.critical_sections(), 1);
    }

    #[test]
    fn test_nested_sections_keep_outer_state() {
        let mut irq = HostInterrupts::new();
        let outer = irq.disable();
        without_interrupts(&mut irq, || ());
        assert!(!irq.interrupts_enabled());
        irq.restore(outer);
        assert!(irq.interrupts_enabled());
        assert_eq!(irq.critical_sections(), 1);
    }
}
