//! Tracking of the composite glyphs being resolved.

use typeface_read::types::GlyphId;

use super::glyf::COMPOSITE_DEPTH_LIMIT;
use crate::Error;

/// The chain of composite glyphs currently being resolved, outermost first.
///
/// Entering a glyph compares it with the glyph halfway up the chain, in the
/// manner of Floyd's tortoise and hare. A component that leads back to one
/// of its ancestors is caught within two trips around the loop without
/// searching the whole chain.
pub(crate) struct CompositeChain {
    glyphs: [GlyphId; COMPOSITE_DEPTH_LIMIT],
    depth: usize,
}

impl CompositeChain {
    pub fn new() -> Self {
        Self {
            glyphs: [GlyphId::NOTDEF; COMPOSITE_DEPTH_LIMIT],
            depth: 0,
        }
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.depth
    }

    /// Appends `glyph_id` to the chain, runs `resolve` and removes the glyph
    /// again.
    ///
    /// Fails with [`Error::CompositeCycle`] if the glyph is its own ancestor
    /// and with [`Error::CompositeDepthExceeded`] if the chain is already
    /// [`COMPOSITE_DEPTH_LIMIT`] glyphs long.
    pub fn resolve<R>(
        &mut self,
        glyph_id: GlyphId,
        resolve: impl FnOnce(&mut Self) -> Result<R, Error>,
    ) -> Result<R, Error> {
        if self.depth == COMPOSITE_DEPTH_LIMIT {
            return Err(Error::CompositeDepthExceeded(glyph_id));
        }
        if self.depth > 0 && self.glyphs[self.depth / 2] == glyph_id {
            return Err(Error::CompositeCycle(glyph_id));
        }
        self.glyphs[self.depth] = glyph_id;
        self.depth += 1;
        let result = resolve(self);
        self.depth -= 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Composite glyphs given as the component list of each glyph id.
    struct Composites<'a>(&'a [&'a [u16]]);

    impl Composites<'_> {
        fn resolve(&self, chain: &mut CompositeChain, gid: u16) -> Result<usize, Error> {
            chain.resolve(GlyphId::new(gid), |chain| {
                let mut max_depth = chain.depth();
                for component in self.0[gid as usize] {
                    max_depth = max_depth.max(self.resolve(chain, *component)?);
                }
                Ok(max_depth)
            })
        }
    }

    #[test]
    fn self_reference() {
        let composites = Composites(&[&[0]]);
        assert_eq!(
            composites.resolve(&mut CompositeChain::new(), 0),
            Err(Error::CompositeCycle(GlyphId::new(0)))
        );
    }

    #[test]
    fn indirect_cycle() {
        let composites = Composites(&[&[1, 2], &[2, 3], &[], &[0, 1]]);
        assert!(matches!(
            composites.resolve(&mut CompositeChain::new(), 0),
            Err(Error::CompositeCycle(_))
        ));
    }

    #[test]
    fn shared_components() {
        // glyph 3 is reached along several paths, which is not a cycle
        let composites = Composites(&[&[1, 2, 3], &[2, 3], &[3], &[]]);
        let mut chain = CompositeChain::new();
        assert_eq!(composites.resolve(&mut chain, 0), Ok(4));
        assert_eq!(chain.depth(), 0);
    }

    #[test]
    fn nesting_limit() {
        let nested: Vec<Vec<u16>> = (0..70u16).map(|gid| vec![gid + 1]).chain([vec![]]).collect();
        let nested: Vec<&[u16]> = nested.iter().map(Vec::as_slice).collect();
        let composites = Composites(&nested);
        let mut chain = CompositeChain::new();
        assert_eq!(
            composites.resolve(&mut chain, 0),
            Err(Error::CompositeDepthExceeded(GlyphId::new(
                COMPOSITE_DEPTH_LIMIT as u16
            )))
        );
        assert_eq!(chain.depth(), 0);
        // a chain right at the limit resolves
        assert_eq!(
            composites.resolve(&mut chain, 70 - COMPOSITE_DEPTH_LIMIT as u16 + 1),
            Ok(COMPOSITE_DEPTH_LIMIT)
        );
    }
}
