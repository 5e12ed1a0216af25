//! Pointwise arithmetic and reductions over a worker's partition.
//!
//! Every kernel reads and writes only `[start, end)` of its vectors, so no
//! kernel here needs a barrier, and a destination may be one of the sources.
//! The reductions end in a collective and return the team-wide value on
//! every worker.
//!
//! Operands shorter than the problem are rejected before any entry is touched.
//! All workers see the same lengths, so the whole team fails together and a
//! failing worker never strands its peers at a later barrier.

use num_traits::Float;

use crate::config::SingularityPolicy;
use crate::core::{Operand, SharedVector};
use crate::error::PlaError;
use crate::parallel::WorkerView;

impl<T: Float + Send + Sync> WorkerView<'_, T> {
    fn expect_operand<A>(&self, what: &'static str, a: &A) -> Result<(), PlaError>
    where
        A: Operand<T> + ?Sized,
    {
        self.expect_len(what, self.global_size(), a.len())
    }

    fn map_into<A>(
        &self,
        a: &A,
        dst: &SharedVector<'_, T>,
        f: impl Fn(T) -> T,
    ) -> Result<(), PlaError>
    where
        A: Operand<T> + ?Sized,
    {
        self.expect_operand("vector kernel input", a)?;
        self.expect_operand("vector kernel output", dst)?;
        for i in self.start..self.end {
            // SAFETY: `i` lies in this worker's partition, which both lengths cover.
            unsafe { dst.store(i, f(a.load(i))) }
        }
        Ok(())
    }

    fn zip_into<A, B>(
        &self,
        a: &A,
        b: &B,
        dst: &SharedVector<'_, T>,
        f: impl Fn(T, T) -> T,
    ) -> Result<(), PlaError>
    where
        A: Operand<T> + ?Sized,
        B: Operand<T> + ?Sized,
    {
        self.expect_operand("vector kernel first input", a)?;
        self.expect_operand("vector kernel second input", b)?;
        self.expect_operand("vector kernel output", dst)?;
        for i in self.start..self.end {
            // SAFETY: `i` lies in this worker's partition, which all lengths cover.
            unsafe { dst.store(i, f(a.load(i), b.load(i))) }
        }
        Ok(())
    }

    fn fold_local<A>(&self, a: &A, init: T, f: impl Fn(T, T) -> T) -> Result<T, PlaError>
    where
        A: Operand<T> + ?Sized,
    {
        self.expect_operand("reduction input", a)?;
        // SAFETY: `i` lies in this worker's partition, which the length covers.
        Ok((self.start..self.end).fold(init, |acc, i| f(acc, unsafe { a.load(i) })))
    }

    /// dst = src
    pub fn copy<A: Operand<T> + ?Sized>(
        &self,
        src: &A,
        dst: &SharedVector<'_, T>,
    ) -> Result<(), PlaError> {
        self.map_into(src, dst, |v| v)
    }

    /// dst = value
    pub fn fill(&self, dst: &SharedVector<'_, T>, value: T) -> Result<(), PlaError> {
        self.expect_operand("fill output", dst)?;
        for i in self.start..self.end {
            // SAFETY: `i` lies in this worker's partition, which the length covers.
            unsafe { dst.store(i, value) }
        }
        Ok(())
    }

    pub fn zeros(&self, dst: &SharedVector<'_, T>) -> Result<(), PlaError> {
        self.fill(dst, T::zero())
    }

    pub fn ones(&self, dst: &SharedVector<'_, T>) -> Result<(), PlaError> {
        self.fill(dst, T::one())
    }

    /// dst = a + b
    pub fn add<A, B>(&self, a: &A, b: &B, dst: &SharedVector<'_, T>) -> Result<(), PlaError>
    where
        A: Operand<T> + ?Sized,
        B: Operand<T> + ?Sized,
    {
        self.zip_into(a, b, dst, |x, y| x + y)
    }

    /// dst = a - b
    pub fn sub<A, B>(&self, a: &A, b: &B, dst: &SharedVector<'_, T>) -> Result<(), PlaError>
    where
        A: Operand<T> + ?Sized,
        B: Operand<T> + ?Sized,
    {
        self.zip_into(a, b, dst, |x, y| x - y)
    }

    /// dst = a ∘ b (elementwise product)
    pub fn mult<A, B>(&self, a: &A, b: &B, dst: &SharedVector<'_, T>) -> Result<(), PlaError>
    where
        A: Operand<T> + ?Sized,
        B: Operand<T> + ?Sized,
    {
        self.zip_into(a, b, dst, |x, y| x * y)
    }

    /// dst = s * a
    pub fn scale<A: Operand<T> + ?Sized>(
        &self,
        s: T,
        a: &A,
        dst: &SharedVector<'_, T>,
    ) -> Result<(), PlaError> {
        self.map_into(a, dst, |x| s * x)
    }

    /// dst = s * a + b
    pub fn scale_add<A, B>(
        &self,
        s: T,
        a: &A,
        b: &B,
        dst: &SharedVector<'_, T>,
    ) -> Result<(), PlaError>
    where
        A: Operand<T> + ?Sized,
        B: Operand<T> + ?Sized,
    {
        self.zip_into(a, b, dst, |x, y| s * x + y)
    }

    /// dst = 1 / a, with no guard against zeros.
    pub fn invert<A: Operand<T> + ?Sized>(
        &self,
        a: &A,
        dst: &SharedVector<'_, T>,
    ) -> Result<(), PlaError> {
        self.map_into(a, dst, |x| x.recip())
    }

    /// dst = 1 / a where `a > threshold`, `1` elsewhere.
    ///
    /// Under [`SingularityPolicy::Report`] this is a collective: every worker
    /// returns [`PlaError::NumericSingularity`] if any entry of the team was
    /// substituted.
    pub fn threshold_invert<A>(
        &mut self,
        a: &A,
        dst: &SharedVector<'_, T>,
        threshold: T,
    ) -> Result<(), PlaError>
    where
        A: Operand<T> + ?Sized,
    {
        let substituted = self.invert_above(a, dst, |x| x > threshold)?;
        self.check_singularity(substituted)
    }

    /// dst = 1 / a where `|a| > threshold`, `1` elsewhere.
    ///
    /// Collective under [`SingularityPolicy::Report`], like
    /// [`threshold_invert`](Self::threshold_invert).
    pub fn abs_threshold_invert<A>(
        &mut self,
        a: &A,
        dst: &SharedVector<'_, T>,
        threshold: T,
    ) -> Result<(), PlaError>
    where
        A: Operand<T> + ?Sized,
    {
        let substituted = self.invert_above(a, dst, |x| x.abs() > threshold)?;
        self.check_singularity(substituted)
    }

    fn invert_above<A>(
        &self,
        a: &A,
        dst: &SharedVector<'_, T>,
        keep: impl Fn(T) -> bool,
    ) -> Result<usize, PlaError>
    where
        A: Operand<T> + ?Sized,
    {
        self.expect_operand("inversion input", a)?;
        self.expect_operand("inversion output", dst)?;
        let mut substituted = 0;
        for i in self.start..self.end {
            // SAFETY: `i` lies in this worker's partition, which both lengths cover.
            unsafe {
                let x = a.load(i);
                if keep(x) {
                    dst.store(i, x.recip());
                } else {
                    dst.store(i, T::one());
                    substituted += 1;
                }
            }
        }
        Ok(substituted)
    }

    fn check_singularity(&mut self, local: usize) -> Result<(), PlaError> {
        match self.ctx.singularity() {
            SingularityPolicy::Substitute => Ok(()),
            SingularityPolicy::Report => {
                let local = num_traits::cast(local).unwrap_or_else(T::max_value);
                let count = self.reduce_sum(local).to_usize().unwrap_or(usize::MAX);
                if count == 0 {
                    Ok(())
                } else {
                    Err(PlaError::NumericSingularity { count })
                }
            }
        }
    }

    /// aᵀb over the whole team.
    pub fn dot<A, B>(&mut self, a: &A, b: &B) -> Result<T, PlaError>
    where
        A: Operand<T> + ?Sized,
        B: Operand<T> + ?Sized,
    {
        self.expect_operand("dot first input", a)?;
        self.expect_operand("dot second input", b)?;
        let mut local = T::zero();
        for i in self.start..self.end {
            // SAFETY: `i` lies in this worker's partition, which both lengths cover.
            local = local + unsafe { a.load(i) * b.load(i) };
        }
        Ok(self.reduce_sum(local))
    }

    /// ‖a‖₂ over the whole team.
    pub fn norm<A: Operand<T> + ?Sized>(&mut self, a: &A) -> Result<T, PlaError> {
        let local = self.fold_local(a, T::zero(), |acc, x| acc + x * x)?;
        Ok(self.reduce_sum(local).sqrt())
    }

    pub fn max<A: Operand<T> + ?Sized>(&mut self, a: &A) -> Result<T, PlaError> {
        let local = self.fold_local(a, -T::max_value(), |m, x| if m < x { x } else { m })?;
        Ok(self.reduce_max(local))
    }

    pub fn min<A: Operand<T> + ?Sized>(&mut self, a: &A) -> Result<T, PlaError> {
        let local = self.fold_local(a, T::max_value(), |m, x| if m > x { x } else { m })?;
        Ok(self.reduce_min(local))
    }

    /// Largest magnitude.
    pub fn absmax<A: Operand<T> + ?Sized>(&mut self, a: &A) -> Result<T, PlaError> {
        let local = self.fold_local(a, -T::max_value(), |m, x| m.max(x.abs()))?;
        Ok(self.reduce_max(local))
    }

    /// Smallest magnitude.
    pub fn absmin<A: Operand<T> + ?Sized>(&mut self, a: &A) -> Result<T, PlaError> {
        let local = self.fold_local(a, T::max_value(), |m, x| m.min(x.abs()))?;
        Ok(self.reduce_min(local))
    }
}
