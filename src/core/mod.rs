//=========================================================================
// Core Systems
//=========================================================================
//
// Building blocks the factory delegates to.
//
// Components:
// - `injection`: type keys, scopes and declared subtype relations
// - `scene`: prefab templates, the node arena and the Instantiator seam
//
//=========================================================================

//=== Module Declarations =================================================

pub mod injection;
pub mod scene;
