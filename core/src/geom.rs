//! Basic geometric primitives.

/// A vertex: a position together with an arbitrary attribute payload.
///
/// The position type is generic because a vertex passes through several
/// coordinate spaces on its way to the screen; the attribute type is
/// generic because the pipeline is agnostic to what it interpolates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex<P, A> {
    pub pos: P,
    pub attrib: A,
}

/// A triangle, defined by three vertices.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Tri<V>(pub [V; 3]);

/// A line segment, defined by its two endpoints.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Edge<V>(pub V, pub V);

/// Creates a vertex with the given position and attribute.
#[inline]
pub const fn vertex<P, A>(pos: P, attrib: A) -> Vertex<P, A> {
    Vertex { pos, attrib }
}

/// Creates a triangle from three vertices.
#[inline]
pub const fn tri<V>(a: V, b: V, c: V) -> Tri<V> {
    Tri([a, b, c])
}

impl<V> Tri<V> {
    /// Maps a function over the vertices of `self`.
    pub fn map<U>(self, f: impl FnMut(V) -> U) -> Tri<U> {
        Tri(self.0.map(f))
    }
}

impl<P, A> Vertex<P, A> {
    /// Maps a function over the position of `self`, keeping the attribute.
    pub fn map_pos<Q>(self, f: impl FnOnce(P) -> Q) -> Vertex<Q, A> {
        vertex(f(self.pos), self.attrib)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tri_map() {
        let t = tri(1, 2, 3).map(|v| v * 10);
        assert_eq!(t, tri(10, 20, 30));
    }

    #[test]
    fn vertex_map_pos() {
        let v = vertex(2, "attr").map_pos(|p| p as f32 * 0.5);
        assert_eq!(v.pos, 1.0);
        assert_eq!(v.attrib, "attr");
    }
}
